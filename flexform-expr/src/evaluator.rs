//! The sandboxed evaluator

use crate::convert::{cel_value_to_json, json_to_cel_value};
use crate::error::{ExprError, Result};
use crate::functions::{self, CustomFunction, BUILTIN_FUNCTIONS};
use crate::Names;
use cel_interpreter::extractors::Arguments;
use cel_interpreter::{Context, ExecutionError, Program, Value as CelValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

/// Default cap on expression length, in bytes
pub const DEFAULT_MAX_LENGTH: usize = 500;

/// Default cap on bracket nesting depth
pub const DEFAULT_MAX_NESTING: usize = 10;

/// Default number of compiled programs kept in the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Size limits applied before an expression is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionLimits {
    /// Longest accepted expression, in bytes
    pub max_length: usize,
    /// Deepest accepted nesting of `()`, `[]` and `{}`
    pub max_nesting: usize,
}

impl Default for ExpressionLimits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

/// Outcome of resolving an expression against a partial set of names.
///
/// A missing name is not a failure while a form is being filled in: the
/// field it belongs to has simply not been reached yet. Callers decide what
/// to do with [`Resolution::Unresolved`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The expression produced a value
    Resolved(Value),
    /// The expression needs a name that was not supplied
    Unresolved { name: String },
}

impl Resolution {
    /// The resolved value, if there is one
    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Unresolved { .. } => None,
        }
    }
}

/// Builder for an [`Evaluator`]
///
/// `empty` is always registered; further pure functions can be added with
/// [`EvaluatorBuilder::function`].
pub struct EvaluatorBuilder {
    functions: BTreeMap<String, CustomFunction>,
    limits: ExpressionLimits,
    cache_capacity: usize,
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        let mut functions = BTreeMap::new();
        functions.insert("empty".to_string(), functions::empty());
        Self {
            functions,
            limits: ExpressionLimits::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Add a function to the allow-list.
    ///
    /// The function must be pure: it sees only its evaluated arguments.
    /// Registering a name twice keeps the last registration.
    pub fn function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Replace the expression size limits
    pub fn limits(mut self, limits: ExpressionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Bound the compiled-program cache. Zero disables caching.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Evaluator {
        let mut allowed: BTreeSet<String> =
            BUILTIN_FUNCTIONS.iter().map(|s| s.to_string()).collect();
        allowed.extend(self.functions.keys().cloned());
        Evaluator {
            functions: self.functions,
            allowed,
            limits: self.limits,
            programs: Mutex::new(ProgramCache::new(self.cache_capacity)),
        }
    }
}

/// Evaluates restricted expressions against a map of names.
///
/// Compiled programs are cached by source text, so re-evaluating the same
/// modifier for every materialization only parses it once. The cache is
/// bounded; the oldest program is evicted first.
pub struct Evaluator {
    functions: BTreeMap<String, CustomFunction>,
    allowed: BTreeSet<String>,
    limits: ExpressionLimits,
    programs: Mutex<ProgramCache>,
}

struct ProgramCache {
    capacity: usize,
    programs: HashMap<String, Arc<Program>>,
    order: VecDeque<String>,
}

impl ProgramCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            programs: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, expression: &str) -> Option<Arc<Program>> {
        self.programs.get(expression).cloned()
    }

    fn insert(&mut self, expression: &str, program: Arc<Program>) {
        if self.capacity == 0 || self.programs.contains_key(expression) {
            return;
        }
        while self.programs.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.programs.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(expression.to_string());
        self.programs.insert(expression.to_string(), program);
    }

    fn len(&self) -> usize {
        self.programs.len()
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("allowed", &self.allowed)
            .field("limits", &self.limits)
            .finish()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// An evaluator with the built-in allow-list and default limits
    pub fn new() -> Self {
        EvaluatorBuilder::new().build()
    }

    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    pub fn limits(&self) -> ExpressionLimits {
        self.limits
    }

    /// Every function an expression may call, sorted by name
    pub fn allowed_functions(&self) -> Vec<String> {
        self.allowed.iter().cloned().collect()
    }

    pub fn is_allowed(&self, function: &str) -> bool {
        self.allowed.contains(function)
    }

    /// Number of compiled programs currently cached
    pub fn cached_programs(&self) -> usize {
        self.programs.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Evaluate `expression` against `names`.
    ///
    /// A missing name is an [`ExprError::NameNotDefined`] here; use
    /// [`Evaluator::resolve`] to treat it as a skip instead.
    pub fn evaluate(&self, expression: &str, names: &Names) -> Result<Value> {
        match self.resolve(expression, names)? {
            Resolution::Resolved(value) => Ok(value),
            Resolution::Unresolved { name } => Err(ExprError::NameNotDefined { name }),
        }
    }

    /// Evaluate `expression`, reporting a missing name as
    /// [`Resolution::Unresolved`].
    ///
    /// Disallowed functions and every other failure are still errors.
    pub fn resolve(&self, expression: &str, names: &Names) -> Result<Resolution> {
        let program = self.compile(expression)?;

        let mut context = Context::default();
        for (name, function) in &self.functions {
            register_function(&mut context, name, function);
        }
        for (name, value) in names {
            context
                .add_variable(name.as_str(), json_to_cel_value(value))
                .map_err(|e| ExprError::expression(format!("failed to bind '{name}': {e}")))?;
        }

        // The interpreter panics on some arithmetic faults (division by zero,
        // integer overflow) instead of returning an error.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| program.execute(&context)))
            .map_err(|payload| {
                let reason = panic_message(payload.as_ref());
                tracing::debug!(expression, %reason, "expression evaluation panicked");
                ExprError::expression(format!("evaluation failed: {reason}"))
            })?;

        match outcome {
            Ok(value) => {
                let value = cel_value_to_json(&value);
                tracing::trace!(expression, result = %value, "expression evaluated");
                Ok(Resolution::Resolved(value))
            }
            Err(ExecutionError::UndeclaredReference(name)) => {
                tracing::trace!(expression, name = %name, "expression references an unknown name");
                Ok(Resolution::Unresolved {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(ExprError::expression(e)),
        }
    }

    /// Compile `expression` and check it against the limits and the
    /// function allow-list without evaluating it.
    pub fn check(&self, expression: &str) -> Result<()> {
        self.compile(expression).map(|_| ())
    }

    fn compile(&self, expression: &str) -> Result<Arc<Program>> {
        if let Some(program) = self
            .programs
            .lock()
            .ok()
            .and_then(|cache| cache.get(expression))
        {
            return Ok(program);
        }

        self.check_limits(expression)?;

        let program = panic::catch_unwind(|| Program::compile(expression))
            .map_err(|payload| {
                ExprError::expression(format!(
                    "invalid expression: {}",
                    panic_message(payload.as_ref())
                ))
            })?
            .map_err(|e| ExprError::expression(format!("invalid expression: {e}")))?;

        let references = program.references();
        let mut called: Vec<&str> = references.functions();
        called.sort_unstable();
        if let Some(name) = called.into_iter().find(|f| !self.allowed.contains(*f)) {
            return Err(ExprError::FunctionNotDefined {
                name: name.to_string(),
            });
        }

        let program = Arc::new(program);
        if let Ok(mut cache) = self.programs.lock() {
            cache.insert(expression, Arc::clone(&program));
        }
        Ok(program)
    }

    fn check_limits(&self, expression: &str) -> Result<()> {
        if expression.len() > self.limits.max_length {
            return Err(ExprError::expression(format!(
                "expression too long: {} characters (max {})",
                expression.len(),
                self.limits.max_length
            )));
        }

        let depth = nesting_depth(expression);
        if depth > self.limits.max_nesting {
            return Err(ExprError::expression(format!(
                "expression nested too deeply: {} levels (max {})",
                depth, self.limits.max_nesting
            )));
        }
        Ok(())
    }
}

fn register_function(context: &mut Context<'_>, name: &str, function: &CustomFunction) {
    let function = Arc::clone(function);
    let function_name = name.to_string();
    context.add_function(
        name,
        move |Arguments(args): Arguments| -> std::result::Result<CelValue, ExecutionError> {
            let json_args: Vec<Value> = args.iter().map(cel_value_to_json).collect();
            function(&json_args)
                .map(|value| json_to_cel_value(&value))
                .map_err(|message| ExecutionError::function_error(&function_name, message))
        },
    );
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "arithmetic error".to_string()
    }
}

/// Maximum nesting of brackets outside string literals
fn nesting_depth(expression: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in expression.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max_depth
}
