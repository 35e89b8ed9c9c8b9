// Copyright 2026 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Unit conversions between the document model's stored units and the
//! package format's (SPEC_FULL.md §6.4): twips, half-points, EMU.

pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const HALF_POINTS_PER_POINT: f64 = 2.0;
pub const EMU_PER_INCH: f64 = 914_400.0;

pub fn twips_to_inches(twips: i32) -> f64 {
    twips as f64 / TWIPS_PER_INCH
}

pub fn inches_to_twips(inches: f64) -> i32 {
    (inches * TWIPS_PER_INCH).round() as i32
}

pub fn half_points_to_points(half_points: u32) -> f64 {
    half_points as f64 / HALF_POINTS_PER_POINT
}

pub fn points_to_half_points(points: f64) -> u32 {
    (points * HALF_POINTS_PER_POINT).round() as u32
}

pub fn emu_to_inches(emu: u32) -> f64 {
    emu as f64 / EMU_PER_INCH
}

pub fn inches_to_emu(inches: f64) -> u32 {
    (inches * EMU_PER_INCH).round() as u32
}
