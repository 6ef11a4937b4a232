// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning constants.

use understory_hull::{DEFAULT_BEVEL_SAMPLES, HullParams};

/// Tuning constants for a [`Frames`](crate::Frames) collection.
///
/// Distances in view space unless noted otherwise. The defaults match the
/// look of shrink-wrapped frames in a typical node editor at 1x zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConfig {
    /// Padding added around each rectangular member before hulling.
    pub padding: f64,
    /// Corner radius for the bevelled render outline, in screen units.
    pub bevel_radius: f64,
    /// Points emitted per bevelled corner.
    pub bevel_samples: usize,
    /// Gap kept between a subframe's hull and its parent's hull.
    pub subframe_inflation: f64,
    /// Points sampled around each point marker.
    pub reroute_samples: usize,
    /// Radius of the circle sampled around each point marker.
    pub reroute_radius: f64,
    /// Default edge hit distance, in screen units.
    pub edge_hit_threshold: f64,
    /// Multiplier applied to label offsets.
    pub label_offset_scale: f64,
}

impl FrameConfig {
    /// Returns the subset of the configuration used for hull building.
    #[must_use]
    pub fn hull_params(&self) -> HullParams {
        HullParams {
            padding: self.padding,
            marker_radius: self.reroute_radius,
            marker_samples: self.reroute_samples,
            subframe_inflation: self.subframe_inflation,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            bevel_radius: 15.0,
            bevel_samples: DEFAULT_BEVEL_SAMPLES,
            subframe_inflation: 20.0,
            reroute_samples: 12,
            reroute_radius: 40.0,
            edge_hit_threshold: 10.0,
            label_offset_scale: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_params_follow_config() {
        let config = FrameConfig {
            padding: 5.0,
            reroute_radius: 7.0,
            ..FrameConfig::default()
        };
        let params = config.hull_params();
        assert_eq!(params.padding, 5.0);
        assert_eq!(params.marker_radius, 7.0);
        assert_eq!(params.marker_samples, 12);
        assert_eq!(params.subframe_inflation, 20.0);
    }
}
