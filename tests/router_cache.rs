use std::sync::Arc;
use waymark_router::{
    Bindings, BoundValue, ConstraintRule, ConstraintSpec, DispatchOptions, RouteOptions, Router,
    SharedCaches,
};

fn dispatch_is_match(router: &Router, pathname: &str) -> bool {
    router
        .route(pathname, DispatchOptions::default(), None)
        .expect("dispatch should succeed")
        .is_some()
}

#[test]
fn repeated_dispatch_hits_the_route_cache() {
    let router = Router::new();
    let route = router
        .add("/cached/:id", RouteOptions::default(), None)
        .expect("route should register");

    assert!(dispatch_is_match(&router, "/cached/1"));
    assert_eq!(route.cache_metrics(), (0, 1));

    assert!(dispatch_is_match(&router, "/cached/1"));
    assert_eq!(route.cache_metrics(), (1, 1));
}

#[test]
fn confirmed_no_match_is_cached_too() {
    let router = Router::new();
    let route = router
        .add("/only/this", RouteOptions::default(), None)
        .expect("route should register");

    assert!(!dispatch_is_match(&router, "/something/else"));
    assert!(!dispatch_is_match(&router, "/something/else"));

    assert_eq!(route.cache_metrics(), (1, 1));
}

#[test]
fn predicate_constraints_disable_the_route_cache() {
    let options = RouteOptions::builder()
        .constraints(ConstraintSpec::predicate(|_: &Bindings| true))
        .build();
    let router = Router::new();
    let route = router
        .add("/gated/:id", options, None)
        .expect("route should register");

    assert!(!route.cacheable());
    assert!(dispatch_is_match(&router, "/gated/1"));
    assert!(dispatch_is_match(&router, "/gated/1"));

    assert_eq!(route.cache_metrics(), (0, 0));
}

#[test]
fn static_constraints_keep_the_route_cache_enabled() {
    let options = RouteOptions::builder()
        .constraints(ConstraintSpec::map([(
            "id",
            ConstraintRule::pattern("\\d+").unwrap(),
        )]))
        .build();
    let router = Router::new();
    let route = router
        .add("/static/:id", options, None)
        .expect("route should register");

    assert!(route.cacheable());
    assert!(dispatch_is_match(&router, "/static/7"));
    assert!(dispatch_is_match(&router, "/static/7"));

    assert_eq!(route.cache_metrics(), (1, 1));
}

#[test]
fn caching_never_changes_observable_outcomes() {
    let rule = || ConstraintRule::pattern("[a-z]+").unwrap();
    let cached_router = Router::new();
    cached_router
        .add(
            "/w/:word",
            RouteOptions::builder()
                .constraints(ConstraintSpec::map([("word", rule())]))
                .build(),
            None,
        )
        .expect("route should register");

    let uncached_router = Router::new();
    uncached_router
        .add(
            "/w/:word",
            RouteOptions::builder()
                .constraints(ConstraintSpec::predicate(|bindings: &Bindings| {
                    bindings
                        .get("word")
                        .and_then(BoundValue::as_single)
                        .is_some_and(|word| {
                            !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase())
                        })
                }))
                .build(),
            None,
        )
        .expect("route should register");

    for pathname in ["/w/alpha", "/w/ALPHA", "/w/alpha", "/w/beta", "/w/ALPHA"] {
        assert_eq!(
            dispatch_is_match(&cached_router, pathname),
            dispatch_is_match(&uncached_router, pathname),
            "outcomes diverged for {pathname}"
        );
    }
}

#[test]
fn mutating_ignore_case_invalidates_cached_outcomes() {
    let router = Router::new();
    let route = router
        .add("/Widgets/:id", RouteOptions::default(), None)
        .expect("route should register");

    assert!(!dispatch_is_match(&router, "/widgets/7"));

    route.set_ignore_case(true);
    assert!(dispatch_is_match(&router, "/widgets/7"));

    route.set_ignore_case(false);
    assert!(!dispatch_is_match(&router, "/widgets/7"));
}

#[test]
fn mutating_constraints_invalidates_cached_outcomes() {
    let router = Router::new();
    let route = router
        .add(
            "/paint/:color",
            RouteOptions::builder()
                .constraints(ConstraintSpec::map([(
                    "color",
                    ConstraintRule::one_of(["red"]),
                )]))
                .build(),
            None,
        )
        .expect("route should register");

    assert!(!dispatch_is_match(&router, "/paint/blue"));

    route.set_constraints(ConstraintSpec::None);
    assert!(dispatch_is_match(&router, "/paint/blue"));
}

#[test]
fn mutation_flushes_only_that_route() {
    let router = Router::new();
    let mutated = router
        .add("/a/:x", RouteOptions::default(), None)
        .expect("route should register");
    let untouched = router
        .add("/b/:x", RouteOptions::default(), None)
        .expect("route should register");

    assert!(dispatch_is_match(&router, "/b/1"));
    assert!(dispatch_is_match(&router, "/b/1"));
    assert_eq!(untouched.cache_metrics(), (1, 1));

    mutated.set_ignore_case(true);

    assert!(dispatch_is_match(&router, "/b/1"));
    assert_eq!(untouched.cache_metrics(), (2, 1));
}

#[test]
fn overlong_pathnames_bypass_both_caches() {
    let router = Router::new();
    let route = router
        .add("/long/:tail*", RouteOptions::default(), None)
        .expect("route should register");

    let pathname = format!("/long/{}", "x".repeat(400));
    assert!(dispatch_is_match(&router, &pathname));
    assert!(dispatch_is_match(&router, &pathname));

    assert_eq!(route.cache_metrics(), (0, 2));
}

#[test]
fn shared_path_cache_memoizes_across_routers() {
    let caches = Arc::new(SharedCaches::new());
    let first = Router::with_caches(Arc::clone(&caches));
    let second = Router::with_caches(Arc::clone(&caches));
    first
        .add("/shared/:x", RouteOptions::default(), None)
        .expect("route should register");
    second
        .add("/shared/:x", RouteOptions::default(), None)
        .expect("route should register");

    assert!(dispatch_is_match(&first, "/shared/1"));
    assert!(dispatch_is_match(&second, "/shared/1"));

    let (hits, misses) = caches.path_metrics();
    assert_eq!((hits, misses), (1, 1));
}
