//! Ordered execution of pipeline steps

use std::sync::Arc;

use topmark_fs::NormalizedPath;

use crate::config::Config;
use crate::context::{HintContext, ProcessingContext, StepContext};
use crate::steps::Step;
use crate::views::Releasable;

/// Runs a fixed list of steps over one file at a time.
///
/// A step runs only while the file has not halted and its
/// [`Step::may_proceed`] gate holds. Hint callbacks run for every step
/// regardless.
pub struct Runner {
    steps: Vec<Box<dyn Step>>,
}

impl Runner {
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self { steps }
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Bootstrap a context for `path` and run every step over it.
    pub fn process(&self, path: impl Into<NormalizedPath>, config: Arc<Config>) -> ProcessingContext {
        let mut ctx = ProcessingContext::bootstrap(path, config);
        self.run(&mut ctx);
        ctx
    }

    /// Run every step over an existing context, then release the views
    /// nothing downstream reads.
    pub fn run(&self, ctx: &mut ProcessingContext) {
        let _span = tracing::debug_span!("process", path = %ctx.path()).entered();
        for step in &self.steps {
            if !ctx.is_halted() && step.may_proceed(ctx) {
                step.run(&mut StepContext::new(ctx, step.name(), step.axes_written()));
            } else if !ctx.is_halted() {
                tracing::trace!(step = step.name(), "Step gated off");
            }
            step.hint(&mut HintContext::new(ctx));
        }
        ctx.views_mut().release();
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("steps", &self.step_names())
            .finish()
    }
}
