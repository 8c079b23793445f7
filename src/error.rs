// Copyright (c) 2023 Mike Tsao. All rights reserved.

use thiserror::Error;

/// Failures while restoring persisted module state.
#[derive(Debug, Error)]
pub enum StateError {
    /// The saved state didn't have the expected shape.
    #[error("malformed modulation state: {0}")]
    Json(#[from] serde_json::Error),
}
