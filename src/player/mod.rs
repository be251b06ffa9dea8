// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Looping playback of a persisted dataset.
// Author: Lukas Bower

//! Playback engine: trail animator, tick loop and terminal renderer.

pub mod animator;
pub mod driver;
pub mod terminal;

pub use animator::{Camera, EntityTrail, PlaybackState, TickOutput, TrailAnimator};
pub use driver::{PlaybackLoop, RenderDriver};
pub use terminal::TerminalRenderer;
