use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::cache::{CacheStats, CachedOutcome, DataCache, SharedCaches};
use crate::compose::{self, PortableComposer};
use crate::constraints::{self, ConstraintFailure, ConstraintRule, ConstraintSpec};
use crate::errors::{RouterError, RouterResult};
use crate::events::{Notifier, RouteActivation, SubscriberId};
use crate::expression::parse_expression;
use crate::matcher::{Bindings, match_path};
use crate::method::{Method, MethodSet};
use crate::path::parse_pathname;
use crate::segment::{ParsedPath, RouteSegment};

#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    pub name: Option<String>,
    pub methods: Option<MethodSet>,
    pub constraints: ConstraintSpec,
    pub encoded: bool,
    pub ignore_case: bool,
}

impl RouteOptions {
    pub fn builder() -> RouteOptionsBuilder {
        RouteOptionsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteOptionsBuilder {
    options: RouteOptions,
}

impl RouteOptionsBuilder {
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.options.name = Some(name.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        let set = self.options.methods.get_or_insert(MethodSet::empty());
        *set |= MethodSet::from(method);
        self
    }

    pub fn methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.options.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn constraints(mut self, constraints: ConstraintSpec) -> Self {
        self.options.constraints = constraints;
        self
    }

    pub fn encoded(mut self, value: bool) -> Self {
        self.options.encoded = value;
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.options.ignore_case = value;
        self
    }

    pub fn build(self) -> RouteOptions {
        self.options
    }
}

/// The matching-relevant state a caller may change after construction.
/// Every mutation flushes the route's match cache.
#[derive(Debug)]
struct MatchState {
    ignore_case: bool,
    constraints: ConstraintSpec,
}

/// One compiled route: an immutable expression and segment sequence plus
/// mutable match options and a per-route result cache. A route needs no
/// router: it composes and matches on its own, and may be attached to any
/// number of routers.
#[derive(Debug)]
pub struct Route {
    expression: String,
    name: Option<String>,
    methods: Option<MethodSet>,
    encoded: bool,
    segments: Vec<RouteSegment>,
    inline_rules: IndexMap<String, ConstraintRule>,
    state: RwLock<MatchState>,
    cache: Mutex<DataCache<CachedOutcome>>,
    stats: CacheStats,
    notifier: Notifier<RouteActivation>,
}

impl Route {
    pub fn new(expression: &str, options: RouteOptions) -> RouterResult<Self> {
        let segments = parse_expression(expression, options.encoded)?;
        let inline_rules = collect_inline_rules(&segments);

        Ok(Self {
            expression: expression.to_string(),
            name: options.name,
            methods: options.methods,
            encoded: options.encoded,
            segments,
            inline_rules,
            state: RwLock::new(MatchState {
                ignore_case: options.ignore_case,
                constraints: options.constraints,
            }),
            cache: Mutex::new(DataCache::new()),
            stats: CacheStats::default(),
            notifier: Notifier::new(),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn methods(&self) -> Option<MethodSet> {
        self.methods
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    pub fn ignore_case(&self) -> bool {
        self.state.read().ignore_case
    }

    /// Name if present, expression otherwise; used in diagnostics.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.expression)
    }

    pub fn set_ignore_case(&self, value: bool) {
        self.state.write().ignore_case = value;
        self.cache.lock().clear();
    }

    pub fn set_constraints(&self, constraints: ConstraintSpec) {
        self.state.write().constraints = constraints;
        self.cache.lock().clear();
    }

    /// Predicate constraints may answer differently per call, so their
    /// presence disables the route's result cache entirely.
    pub fn cacheable(&self) -> bool {
        !self.state.read().constraints.has_predicate()
    }

    /// (hits, misses) of this route's match cache.
    pub fn cache_metrics(&self) -> (u64, u64) {
        self.stats.snapshot()
    }

    /// Standalone, uncached match against a raw pathname.
    pub fn matches(&self, pathname: &str) -> Option<Bindings> {
        let parsed = parse_pathname(pathname);
        self.evaluate(&parsed)
    }

    /// Router-driven match: consults the per-route cache when the route is
    /// cache-eligible and the pathname is cacheable. Cache hits clone out
    /// fresh bindings; callers never alias cache-internal storage.
    pub(crate) fn match_in(
        &self,
        caches: &SharedCaches,
        pathname: &str,
        parsed: &ParsedPath,
    ) -> Option<Bindings> {
        if !self.cacheable() {
            return self.evaluate(parsed);
        }

        let mut cache = self.cache.lock();
        if let Some(outcome) = cache.lookup(caches.translator(), pathname) {
            self.stats.record_hit();
            return match outcome {
                CachedOutcome::Match(bindings) => Some(bindings.clone()),
                CachedOutcome::NoMatch => None,
            };
        }

        self.stats.record_miss();
        let result = self.evaluate(parsed);
        let outcome = match &result {
            Some(bindings) => CachedOutcome::Match(bindings.clone()),
            None => CachedOutcome::NoMatch,
        };
        cache.store(caches.translator(), pathname, outcome);
        result
    }

    /// Match walk plus both validation tiers: inline expression constraints
    /// first, then the route's own specification. Either tier rejecting is
    /// a plain no-match.
    fn evaluate(&self, parsed: &ParsedPath) -> Option<Bindings> {
        let state = self.state.read();
        let bindings = match_path(&self.segments, parsed, state.ignore_case)?;
        if constraints::validate_rules(&bindings, &self.inline_rules).is_err() {
            return None;
        }
        if constraints::validate(&bindings, &state.constraints).is_err() {
            return None;
        }
        Some(bindings)
    }

    /// Renders a concrete path for the given bindings. Bindings that fail
    /// the route's constraints are a usage error naming the offending
    /// parameter (or the route alone for the whole-map predicate form).
    pub fn compose(&self, bindings: &Bindings) -> RouterResult<String> {
        self.check_bindings(bindings)?;
        Ok(compose::compose(&self.segments, bindings))
    }

    fn check_bindings(&self, bindings: &Bindings) -> RouterResult<()> {
        let state = self.state.read();
        let verdict = constraints::validate_rules(bindings, &self.inline_rules)
            .and_then(|()| constraints::validate(bindings, &state.constraints));

        match verdict {
            Ok(()) => Ok(()),
            Err(ConstraintFailure::Rejected) => Err(RouterError::BindingsRejected {
                route: self.label().to_string(),
            }),
            Err(ConstraintFailure::Parameter { name, value }) => {
                Err(RouterError::ParameterRejected {
                    route: self.label().to_string(),
                    parameter: name,
                    value,
                })
            }
        }
    }

    pub fn portable_composer(&self) -> PortableComposer {
        PortableComposer::from_segments(&self.segments)
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&RouteActivation) + Send + Sync + 'static,
    ) -> SubscriberId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub(crate) fn notifier(&self) -> &Notifier<RouteActivation> {
        &self.notifier
    }
}

/// Inline `(pattern)` constraints become a precompiled rule map validated
/// ahead of the route's own specification.
fn collect_inline_rules(segments: &[RouteSegment]) -> IndexMap<String, ConstraintRule> {
    let mut rules = IndexMap::new();
    for segment in segments {
        match segment {
            RouteSegment::Param {
                name,
                pattern: Some(pattern),
            }
            | RouteSegment::Wildcard {
                name,
                pattern: Some(pattern),
            } => {
                rules.insert(name.clone(), ConstraintRule::Pattern(pattern.clone()));
            }
            _ => {}
        }
    }
    rules
}
