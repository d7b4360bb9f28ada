//! Detector initialization configuration.
//!
//! The external engine accepts a target surface, camera constraints, a
//! decoder symbology list, and debug/visualization flags. The defaults here
//! reproduce a rear-camera live-stream setup tuned for Code 39 badges.

use serde::{Deserialize, Serialize};

/// Which camera to prefer on multi-camera devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// The rear ("environment") camera, required exactly.
    ///
    /// Init fails rather than falling back to a front camera, since a
    /// selfie camera is useless for scanning shelf labels.
    RearExact,
    /// The rear camera, preferred but not required.
    Rear,
    /// The front ("user") camera.
    Front,
}

/// A min/ideal/max bound on one capture dimension, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRange {
    /// Minimum acceptable value.
    pub min: u32,
    /// Preferred value.
    pub ideal: u32,
    /// Maximum acceptable value.
    pub max: u32,
}

impl DimensionRange {
    /// Creates a range, clamping `ideal` into `[min, max]`.
    pub fn new(min: u32, ideal: u32, max: u32) -> Self {
        Self {
            min,
            ideal: ideal.clamp(min, max),
            max: max.max(min),
        }
    }

    /// Returns `true` if `value` lies within the bound.
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Camera stream constraints handed to the engine at init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    /// Which camera to open.
    pub facing: CameraFacing,
    /// Capture width bound.
    pub width: DimensionRange,
    /// Capture height bound.
    pub height: DimensionRange,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: CameraFacing::RearExact,
            width: DimensionRange::new(640, 1280, 1920),
            height: DimensionRange::new(480, 720, 1080),
        }
    }
}

/// A barcode symbology the engine should decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// Code 39.
    Code39,
    /// Code 128.
    Code128,
    /// EAN-13.
    Ean13,
    /// EAN-8.
    Ean8,
    /// UPC-A.
    UpcA,
    /// Interleaved 2 of 5.
    Itf,
}

impl Symbology {
    /// Returns the engine-facing reader identifier.
    pub fn reader_name(&self) -> &'static str {
        match self {
            Self::Code39 => "code_39_reader",
            Self::Code128 => "code_128_reader",
            Self::Ean13 => "ean_reader",
            Self::Ean8 => "ean_8_reader",
            Self::UpcA => "upc_reader",
            Self::Itf => "i2of5_reader",
        }
    }
}

/// Decoding options for the Code 39 reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code39Options {
    /// Verify the optional mod-43 checksum.
    pub checksum: bool,
    /// Skip the start/stop sentinel characters in the decoded value.
    pub skip_start: bool,
    /// Reject codes with marginal bar-width ratios.
    pub strict: bool,
}

impl Default for Code39Options {
    fn default() -> Self {
        // Badge printers in the field routinely omit the checksum, so the
        // lenient profile is the shipping default.
        Self {
            checksum: false,
            skip_start: true,
            strict: false,
        }
    }
}

/// Debug visualization flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugFlags {
    /// Draw the located barcode's bounding box on the preview surface.
    pub draw_bounding_box: bool,
    /// Overlay the sampled bar pattern.
    pub show_pattern: bool,
}

/// Full initialization configuration for the external detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Name of the presentation element hosting the live preview.
    pub target: String,
    /// Camera stream constraints.
    pub camera: CameraConstraints,
    /// Symbologies to decode.
    pub symbologies: Vec<Symbology>,
    /// Code 39 reader options, applied when [`Symbology::Code39`] is listed.
    pub code39: Code39Options,
    /// Locate the barcode within the frame before decoding.
    pub locate: bool,
    /// Decode at most one code per frame.
    pub single_code: bool,
    /// Debug visualization flags.
    pub debug: DebugFlags,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            target: "interactive".to_string(),
            camera: CameraConstraints::default(),
            symbologies: vec![Symbology::Code39],
            code39: Code39Options::default(),
            locate: true,
            single_code: true,
            debug: DebugFlags {
                draw_bounding_box: true,
                show_pattern: true,
            },
        }
    }
}

impl DetectorConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preview target element name.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the camera constraints.
    pub fn with_camera(mut self, camera: CameraConstraints) -> Self {
        self.camera = camera;
        self
    }

    /// Replaces the symbology list.
    pub fn with_symbologies(mut self, symbologies: Vec<Symbology>) -> Self {
        self.symbologies = symbologies;
        self
    }

    /// Sets the Code 39 reader options.
    pub fn with_code39(mut self, options: Code39Options) -> Self {
        self.code39 = options;
        self
    }

    /// Enables or disables barcode localization.
    pub fn with_locate(mut self, locate: bool) -> Self {
        self.locate = locate;
        self
    }

    /// Sets the debug visualization flags.
    pub fn with_debug(mut self, debug: DebugFlags) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the engine-facing reader identifiers, in order.
    pub fn reader_names(&self) -> Vec<&'static str> {
        self.symbologies.iter().map(Symbology::reader_name).collect()
    }
}
