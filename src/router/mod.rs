mod input;

pub use input::{DispatchOptions, RouteInput};

use hashbrown::HashMap as FastHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::cache::SharedCaches;
use crate::errors::{RouterError, RouterResult};
use crate::events::{Notifier, RouteActivation, RouteListener, RouterEvent, SubscriberId};
use crate::matcher::Bindings;
use crate::method::Method;
use crate::route::{Route, RouteOptions};

#[derive(Debug, Default)]
struct MethodStore {
    routes: Vec<Arc<Route>>,
    by_name: FastHashMap<String, Arc<Route>>,
}

impl MethodStore {
    fn insert(&mut self, route: &Arc<Route>) {
        self.routes.push(Arc::clone(route));
        if let Some(name) = route.name() {
            self.by_name.insert(name.to_string(), Arc::clone(route));
        }
    }

    fn remove(&mut self, route: &Arc<Route>) {
        self.routes.retain(|candidate| !Arc::ptr_eq(candidate, route));
        if let Some(name) = route.name()
            && self
                .by_name
                .get(name)
                .is_some_and(|candidate| Arc::ptr_eq(candidate, route))
        {
            self.by_name.remove(name);
        }
    }
}

#[derive(Debug)]
struct RouterStores {
    /// Union of every attached route, in insertion order.
    all: MethodStore,
    by_method: [MethodStore; Method::COUNT],
}

impl RouterStores {
    fn new() -> Self {
        Self {
            all: MethodStore::default(),
            by_method: std::array::from_fn(|_| MethodStore::default()),
        }
    }
}

/// Identifies a route to `remove`: by registered name or by identity.
#[derive(Debug, Clone)]
pub enum RouteSelector {
    Name(String),
    Route(Arc<Route>),
}

impl From<&str> for RouteSelector {
    fn from(name: &str) -> Self {
        RouteSelector::Name(name.to_string())
    }
}

impl From<String> for RouteSelector {
    fn from(name: String) -> Self {
        RouteSelector::Name(name)
    }
}

impl From<Arc<Route>> for RouteSelector {
    fn from(route: Arc<Route>) -> Self {
        RouteSelector::Route(route)
    }
}

impl From<&Arc<Route>> for RouteSelector {
    fn from(route: &Arc<Route>) -> Self {
        RouteSelector::Route(Arc::clone(route))
    }
}

/// Ordered, named collection of routes, optionally segregated by HTTP
/// method. Dispatch is a linear first-registered-wins scan: no specificity
/// ranking exists, and an application orders its routes from most to least
/// specific itself.
#[derive(Debug)]
pub struct Router {
    stores: RwLock<RouterStores>,
    caches: Arc<SharedCaches>,
    notifier: Notifier<RouterEvent>,
}

impl Router {
    pub fn new() -> Self {
        Self::with_caches(Arc::new(SharedCaches::new()))
    }

    /// Builds a router over existing shared cache state, so several
    /// routers can share one key translator and parsed-path cache.
    pub fn with_caches(caches: Arc<SharedCaches>) -> Self {
        Self {
            stores: RwLock::new(RouterStores::new()),
            caches,
            notifier: Notifier::new(),
        }
    }

    pub fn caches(&self) -> &Arc<SharedCaches> {
        &self.caches
    }

    /// Compiles and attaches a route. A duplicate name is an error; the
    /// optional listener subscribes to the new route's activations.
    pub fn add(
        &self,
        expression: &str,
        options: RouteOptions,
        listener: Option<RouteListener>,
    ) -> RouterResult<Arc<Route>> {
        let route = Arc::new(Route::new(expression, options)?);
        self.attach(route, listener)
    }

    /// Attaches a pre-built route; the route stays usable on its own and
    /// may be attached to several routers.
    pub fn add_route(
        &self,
        route: Arc<Route>,
        listener: Option<RouteListener>,
    ) -> RouterResult<Arc<Route>> {
        self.attach(route, listener)
    }

    fn attach(
        &self,
        route: Arc<Route>,
        listener: Option<RouteListener>,
    ) -> RouterResult<Arc<Route>> {
        {
            let mut stores = self.stores.write();
            if let Some(name) = route.name()
                && stores.all.by_name.contains_key(name)
            {
                return Err(RouterError::DuplicateRouteName {
                    name: name.to_string(),
                });
            }

            stores.all.insert(&route);
            match route.methods() {
                None => {
                    for store in stores.by_method.iter_mut() {
                        store.insert(&route);
                    }
                }
                Some(set) => {
                    for method in set.methods() {
                        stores.by_method[method.index()].insert(&route);
                    }
                }
            }
        }

        if let Some(listener) = listener {
            route.notifier().register(listener, false);
        }
        tracing::event!(
            tracing::Level::DEBUG,
            operation = "add",
            expression = %route.expression(),
        );
        self.notifier.emit(&RouterEvent::Add {
            route: Arc::clone(&route),
        });

        Ok(route)
    }

    /// Detaches a route from every store. An unknown name or an unattached
    /// route is a no-op returning `None`, not an error. The removed route
    /// remains independently usable.
    pub fn remove(&self, selector: impl Into<RouteSelector>) -> Option<Arc<Route>> {
        let selector = selector.into();
        let removed = {
            let mut stores = self.stores.write();
            let found = match &selector {
                RouteSelector::Name(name) => stores.all.by_name.get(name.as_str()).cloned(),
                RouteSelector::Route(route) => stores
                    .all
                    .routes
                    .iter()
                    .find(|candidate| Arc::ptr_eq(candidate, route))
                    .cloned(),
            }?;

            stores.all.remove(&found);
            for store in stores.by_method.iter_mut() {
                store.remove(&found);
            }
            found
        };

        tracing::event!(
            tracing::Level::DEBUG,
            operation = "remove",
            expression = %removed.expression(),
        );
        self.notifier.emit(&RouterEvent::Remove {
            route: Arc::clone(&removed),
        });

        Some(removed)
    }

    /// Resolves the input, scans the selected store in insertion order and
    /// returns the first route whose match survives validation. The
    /// optional listener is registered one-shot on the matched route before
    /// the activation fires, so it observes this very dispatch. No match is
    /// a first-class outcome: a `Fail` notification and `Ok(None)`.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn route(
        &self,
        input: impl Into<RouteInput>,
        options: DispatchOptions,
        listener: Option<RouteListener>,
    ) -> RouterResult<Option<Arc<Route>>> {
        let (pathname, method) = input.into().resolve(&options)?;
        let data = options.data;
        let parsed = self.caches.parse(&pathname);

        // Snapshot the scan order so listeners run without the store lock
        // held; mutating the route set from a listener mid-dispatch is
        // still undefined behavior contractually.
        let candidates: Vec<Arc<Route>> = {
            let stores = self.stores.read();
            let store = match method {
                Some(method) => &stores.by_method[method.index()],
                None => &stores.all,
            };
            store.routes.clone()
        };

        let mut matched: Option<(Arc<Route>, Bindings)> = None;
        for route in candidates {
            if let Some(arguments) = route.match_in(&self.caches, &pathname, &parsed) {
                matched = Some((route, arguments));
                break;
            }
        }

        match matched {
            Some((route, arguments)) => {
                if let Some(listener) = listener {
                    route.notifier().register(listener, true);
                }

                tracing::event!(
                    tracing::Level::TRACE,
                    operation = "route",
                    pathname = %pathname,
                    matched = %route.expression(),
                );
                let activation = RouteActivation {
                    pathname,
                    method,
                    route: Arc::clone(&route),
                    arguments,
                    data,
                };
                route.notifier().emit(&activation);
                self.notifier.emit(&RouterEvent::Success(activation));

                Ok(Some(route))
            }
            None => {
                tracing::event!(
                    tracing::Level::TRACE,
                    operation = "route",
                    pathname = %pathname,
                    outcome = "fail",
                );
                self.notifier.emit(&RouterEvent::Fail {
                    pathname,
                    method,
                    data,
                });

                Ok(None)
            }
        }
    }

    /// Composes a path through the named route. An unknown name is an
    /// error; constraint violations surface from the route's composer.
    pub fn path(&self, name: &str, bindings: &Bindings) -> RouterResult<String> {
        let route = {
            self.stores.read().all.by_name.get(name).cloned()
        }
        .ok_or_else(|| RouterError::UnknownRouteName {
            name: name.to_string(),
        })?;

        route.compose(bindings)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Route>> {
        self.stores.read().all.by_name.get(name).cloned()
    }

    pub fn routes(&self) -> Vec<Arc<Route>> {
        self.stores.read().all.routes.clone()
    }

    pub fn len(&self) -> usize {
        self.stores.read().all.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self, callback: impl Fn(&RouterEvent) + Send + Sync + 'static) -> SubscriberId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
