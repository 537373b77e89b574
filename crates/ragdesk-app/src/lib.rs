// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod action;
pub mod modal;
pub mod names;
pub mod state;

pub use action::*;
pub use modal::*;
pub use names::*;
pub use state::*;
