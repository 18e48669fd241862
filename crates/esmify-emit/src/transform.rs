//! Transformer hooks run on each tree right before it is printed.

use anyhow::{Context, Result};
use esmify_syntax::EmitUnit;

pub trait Transformer {
    /// Name used in error context and logs.
    fn name(&self) -> &str {
        "transformer"
    }

    fn transform(&self, unit: EmitUnit) -> Result<EmitUnit>;
}

impl<F> Transformer for F
where
    F: Fn(EmitUnit) -> Result<EmitUnit>,
{
    fn transform(&self, unit: EmitUnit) -> Result<EmitUnit> {
        self(unit)
    }
}

/// Hooks run after the built-in transforms: `after` on code output,
/// `after_declarations` on declaration output.
#[derive(Default)]
pub struct EmitTransformers {
    pub after: Vec<Box<dyn Transformer>>,
    pub after_declarations: Vec<Box<dyn Transformer>>,
}

impl EmitTransformers {
    pub fn new() -> Self {
        EmitTransformers::default()
    }

    pub fn with_after(mut self, transformer: impl Transformer + 'static) -> Self {
        self.after.push(Box::new(transformer));
        self
    }

    pub fn with_after_declarations(mut self, transformer: impl Transformer + 'static) -> Self {
        self.after_declarations.push(Box::new(transformer));
        self
    }

    pub fn run_after(&self, unit: EmitUnit) -> Result<EmitUnit> {
        run_all(&self.after, unit)
    }

    pub fn run_after_declarations(&self, unit: EmitUnit) -> Result<EmitUnit> {
        run_all(&self.after_declarations, unit)
    }
}

impl std::fmt::Debug for EmitTransformers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitTransformers")
            .field("after", &hook_names(&self.after))
            .field("after_declarations", &hook_names(&self.after_declarations))
            .finish()
    }
}

fn hook_names(hooks: &[Box<dyn Transformer>]) -> Vec<&str> {
    hooks.iter().map(|hook| hook.name()).collect()
}

fn run_all(hooks: &[Box<dyn Transformer>], mut unit: EmitUnit) -> Result<EmitUnit> {
    for hook in hooks {
        unit = hook
            .transform(unit)
            .with_context(|| format!("{} failed", hook.name()))?;
    }
    Ok(unit)
}
