//! Named step sequences

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::registry::Registry;
use crate::runner::Runner;
use crate::steps::{
    BuilderStep, ComparerStep, PatcherStep, PlannerStep, ReaderStep, RendererStep, ResolverStep,
    ScannerStep, SnifferStep, Step, StripperStep, WriterStep,
};

/// The step sequences the tool knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    /// Resolve, sniff, read and scan. Reports what is there without
    /// computing any change.
    Probe,
    /// Bring headers in line with the configured fields.
    Check,
    /// Remove existing headers.
    Strip,
}

impl Pipeline {
    pub const ALL: &'static [Pipeline] = &[Pipeline::Probe, Pipeline::Check, Pipeline::Strip];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::Check => "check",
            Self::Strip => "strip",
        }
    }

    /// Assemble a runner for this pipeline over `registry`.
    pub fn runner(&self, registry: Arc<Registry>) -> Runner {
        let mut steps: Vec<Box<dyn Step>> = vec![
            Box::new(ResolverStep::new(registry)),
            Box::new(SnifferStep),
            Box::new(ReaderStep),
            Box::new(ScannerStep),
        ];
        match self {
            Self::Probe => {}
            Self::Check => steps.extend([
                Box::new(BuilderStep) as Box<dyn Step>,
                Box::new(RendererStep),
                Box::new(ComparerStep),
                Box::new(PlannerStep),
                Box::new(PatcherStep),
                Box::new(WriterStep),
            ]),
            Self::Strip => steps.extend([
                Box::new(StripperStep) as Box<dyn Step>,
                Box::new(ComparerStep),
                Box::new(PlannerStep),
                Box::new(PatcherStep),
                Box::new(WriterStep),
            ]),
        }
        Runner::new(steps)
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pipeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|pipeline| pipeline.name() == s)
            .ok_or_else(|| format!("unknown pipeline: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let registry = Arc::new(Registry::builtin());
        assert_eq!(
            Pipeline::Probe.runner(Arc::clone(&registry)).step_names(),
            ["resolver", "sniffer", "reader", "scanner"]
        );
        assert_eq!(
            Pipeline::Strip.runner(registry).step_names(),
            ["resolver", "sniffer", "reader", "scanner", "stripper", "comparer", "planner", "patcher", "writer"]
        );
    }

    #[test]
    fn test_parse_round_trip() {
        for pipeline in Pipeline::ALL {
            assert_eq!(pipeline.name().parse::<Pipeline>().unwrap(), *pipeline);
        }
        assert!("sync".parse::<Pipeline>().is_err());
    }
}
