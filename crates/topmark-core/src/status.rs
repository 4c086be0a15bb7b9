//! Processing status axes
//!
//! Every file carries one status value per axis. Each axis starts out
//! `Pending` and is written by exactly one pipeline step; see
//! [`crate::steps::Step::axes_written`].

use std::fmt;

use serde::Serialize;

macro_rules! status_axes {
    (
        $(
            $(#[$doc:meta])*
            $field:ident : $axis:ident => $ty:ident {
                $( $(#[$vdoc:meta])* $variant:ident = $label:literal ),+ $(,)?
            }
        )+
    ) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
            #[serde(rename_all = "snake_case")]
            pub enum $ty {
                /// Not yet decided.
                #[default]
                Pending,
                $( $(#[$vdoc])* $variant, )+
            }

            impl $ty {
                pub fn label(&self) -> &'static str {
                    match self {
                        Self::Pending => "pending",
                        $( Self::$variant => $label, )+
                    }
                }

                pub fn is_pending(&self) -> bool {
                    matches!(self, Self::Pending)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl From<$ty> for AxisUpdate {
                fn from(value: $ty) -> Self {
                    AxisUpdate::$axis(value)
                }
            }
        )+

        /// Identifies one status axis.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Axis {
            $( $axis, )+
        }

        impl Axis {
            pub const ALL: &'static [Axis] = &[$( Axis::$axis, )+];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Axis::$axis => stringify!($field), )+
                }
            }
        }

        impl fmt::Display for Axis {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        /// A new value for one axis.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum AxisUpdate {
            $( $axis($ty), )+
        }

        impl AxisUpdate {
            /// The axis this update targets.
            pub fn axis(&self) -> Axis {
                match self {
                    $( AxisUpdate::$axis(_) => Axis::$axis, )+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( AxisUpdate::$axis(value) => value.label(), )+
                }
            }
        }

        /// Status of one file across every axis.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
        pub struct ProcessingStatus {
            $( pub $field: $ty, )+
        }

        impl ProcessingStatus {
            /// Store an update on its axis.
            pub fn apply(&mut self, update: AxisUpdate) {
                match update {
                    $( AxisUpdate::$axis(value) => self.$field = value, )+
                }
            }

            /// Current label of an axis.
            pub fn label(&self, axis: Axis) -> &'static str {
                match axis {
                    $( Axis::$axis => self.$field.label(), )+
                }
            }

            pub fn is_pending(&self, axis: Axis) -> bool {
                match axis {
                    $( Axis::$axis => self.$field.is_pending(), )+
                }
            }
        }
    };
}

status_axes! {
    /// File-type and processor resolution.
    resolve: Resolve => ResolveStatus {
        Resolved = "resolved",
        /// The type is known but never carries headers.
        TypeResolvedHeadersUnsupported = "type_resolved_headers_unsupported",
        TypeResolvedNoProcessor = "type_resolved_no_processor",
        Unsupported = "unsupported",
    }

    /// Cheap pre-read checks on the raw bytes.
    fs: Fs => FsStatus {
        Ok = "ok",
        Empty = "empty",
        NotFound = "not_found",
        NoReadPermission = "no_read_permission",
        Unreadable = "unreadable",
        Binary = "binary",
        InvalidEncoding = "invalid_encoding",
        BomBeforeShebang = "bom_before_shebang",
        MixedLineEndings = "mixed_line_endings",
    }

    /// Decoding the file into a line image.
    content: Content => ContentStatus {
        Ok = "ok",
        Unreadable = "unreadable",
        SkippedMixedLineEndings = "skipped_mixed_line_endings",
    }

    /// Existing header detection.
    header: Header => HeaderStatus {
        Missing = "missing",
        Detected = "detected",
        /// Markers found with nothing between them.
        Empty = "empty",
        MalformedSomeFields = "malformed_some_fields",
        MalformedAllFields = "malformed_all_fields",
        /// Unbalanced or misplaced markers.
        Malformed = "malformed",
    }

    /// Field value generation.
    generation: Generation => GenerationStatus {
        Generated = "generated",
        NoFields = "no_fields",
    }

    render: Render => RenderStatus {
        Rendered = "rendered",
        Skipped = "skipped",
    }

    strip: Strip => StripStatus {
        Ready = "ready",
        NotNeeded = "not_needed",
        Failed = "failed",
    }

    /// Existing against expected header.
    comparison: Comparison => ComparisonStatus {
        Changed = "changed",
        Unchanged = "unchanged",
        Skipped = "skipped",
        CannotCompare = "cannot_compare",
    }

    /// Planned mutation of the image.
    plan: Plan => PlanStatus {
        Inserted = "inserted",
        Replaced = "replaced",
        Removed = "removed",
        Skipped = "skipped",
        Failed = "failed",
        /// Plain-format output that is shown but never applied.
        Previewed = "previewed",
    }

    patch: Patch => PatchStatus {
        Generated = "generated",
        Skipped = "skipped",
        Failed = "failed",
    }

    write: Write => WriteStatus {
        Written = "written",
        Previewed = "previewed",
        Skipped = "skipped",
        Failed = "failed",
    }
}

impl PlanStatus {
    /// Whether the plan produced a new image worth persisting.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Inserted | Self::Replaced | Self::Removed)
    }
}

impl HeaderStatus {
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Malformed | Self::MalformedSomeFields | Self::MalformedAllFields
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_axis_starts_pending() {
        let status = ProcessingStatus::default();
        for axis in Axis::ALL {
            assert!(status.is_pending(*axis), "{axis} should start pending");
        }
    }

    #[test]
    fn test_apply_targets_only_its_axis() {
        let mut status = ProcessingStatus::default();
        status.apply(HeaderStatus::Detected.into());
        assert_eq!(status.header, HeaderStatus::Detected);
        assert_eq!(status.label(Axis::Header), "detected");
        assert!(status.is_pending(Axis::Comparison));
    }

    #[test]
    fn test_labels_serialize_as_snake_case() {
        let json = serde_json::to_string(&FsStatus::BomBeforeShebang).unwrap();
        assert_eq!(json, "\"bom_before_shebang\"");
        assert_eq!(FsStatus::BomBeforeShebang.to_string(), "bom_before_shebang");
        assert_eq!(Axis::Generation.name(), "generation");
    }

    #[test]
    fn test_update_reports_its_axis() {
        let update: AxisUpdate = WriteStatus::Previewed.into();
        assert_eq!(update.axis(), Axis::Write);
        assert_eq!(update.label(), "previewed");
    }
}
