// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod utils;
pub mod commands;

pub mod identity;
pub mod ratio;
pub mod normalize;
pub mod baseline;
pub mod range;
pub mod control;
pub mod filter;
pub mod changes;
pub mod summary;
pub mod pipeline;
pub mod sources;
pub mod sink;
