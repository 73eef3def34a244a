use waymark_router::{
    Bindings, BoundValue, ConstraintRule, ConstraintSpec, Route, RouteOptions,
};

fn bindings(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), BoundValue::from(*value)))
        .collect()
}

#[test]
fn matches_static_route_exactly() {
    let route = Route::new("/about/team", RouteOptions::default()).unwrap();

    assert_eq!(route.matches("/about/team"), Some(Bindings::new()));
    assert_eq!(route.matches("/about"), None);
    assert_eq!(route.matches("/about/team/lead"), None);
}

#[test]
fn binds_parameters_in_order() {
    let route = Route::new("/users/:user/posts/:post", RouteOptions::default()).unwrap();

    let matched = route.matches("/users/alice/posts/42").expect("should match");
    assert_eq!(matched, bindings(&[("user", "alice"), ("post", "42")]));
}

#[test]
fn wildcard_captures_all_remaining_segments() {
    let route = Route::new("/files/:dir*", RouteOptions::default()).unwrap();

    let matched = route.matches("/files/a/b/c").expect("should match");
    assert_eq!(
        matched.get("dir"),
        Some(&BoundValue::from(vec!["a", "b", "c"]))
    );
}

#[test]
fn wildcard_accepts_zero_remaining_segments() {
    let route = Route::new("/files/:dir*", RouteOptions::default()).unwrap();

    let matched = route.matches("/files").expect("should match");
    assert_eq!(matched.get("dir"), Some(&BoundValue::Many(Vec::new())));
}

#[test]
fn optional_trailing_slash_accepts_both_forms() {
    let route = Route::new("/x/?", RouteOptions::default()).unwrap();

    assert!(route.matches("/x").is_some());
    assert!(route.matches("/x/").is_some());
}

#[test]
fn missing_marker_rejects_a_trailing_slash() {
    let route = Route::new("/x", RouteOptions::default()).unwrap();

    assert!(route.matches("/x").is_some());
    assert!(route.matches("/x/").is_none());
}

#[test]
fn mandatory_marker_requires_the_trailing_slash() {
    let route = Route::new("/x/", RouteOptions::default()).unwrap();

    assert!(route.matches("/x/").is_some());
    assert!(route.matches("/x").is_none());
}

#[test]
fn root_route_matches_only_the_root_path() {
    let route = Route::new("/", RouteOptions::default()).unwrap();

    assert!(route.matches("/").is_some());
    assert!(route.matches("/x").is_none());
}

#[test]
fn literal_comparison_is_case_sensitive_by_default() {
    let route = Route::new("/Widgets/:id", RouteOptions::default()).unwrap();

    assert!(route.matches("/widgets/7").is_none());
}

#[test]
fn ignore_case_folds_literal_comparisons() {
    let options = RouteOptions::builder().ignore_case(true).build();
    let route = Route::new("/Widgets/:id", options).unwrap();

    let matched = route.matches("/widgets/7").expect("should match");
    assert_eq!(matched, bindings(&[("id", "7")]));
}

#[test]
fn parameter_values_arrive_percent_decoded() {
    let route = Route::new("/docs/:title", RouteOptions::default()).unwrap();

    let matched = route.matches("/docs/my%20notes").expect("should match");
    assert_eq!(matched, bindings(&[("title", "my notes")]));
}

#[test]
fn encoded_literal_matches_the_decoded_path_form() {
    let options = RouteOptions::builder().encoded(true).build();
    let route = Route::new("/caf%C3%A9", options).unwrap();

    assert!(route.matches("/caf%C3%A9").is_some());
    assert!(route.matches("/café").is_some());
}

#[test]
fn inline_constraint_filters_the_match() {
    let route = Route::new("/users/:id(\\d+)", RouteOptions::default()).unwrap();

    assert!(route.matches("/users/42").is_some());
    assert!(route.matches("/users/alice").is_none());
}

#[test]
fn inline_constraint_applies_to_each_wildcard_element() {
    let route = Route::new("/versions/:v(\\d+)*", RouteOptions::default()).unwrap();

    assert!(route.matches("/versions/1/2/3").is_some());
    assert!(route.matches("/versions/1/two/3").is_none());
}

#[test]
fn route_constraints_reject_after_a_structural_match() {
    let options = RouteOptions::builder()
        .constraints(ConstraintSpec::map([(
            "color",
            ConstraintRule::one_of(["red", "blue"]),
        )]))
        .build();
    let route = Route::new("/paint/:color", options).unwrap();

    assert!(route.matches("/paint/red").is_some());
    assert!(route.matches("/paint/green").is_none());
}

#[test]
fn whole_map_predicate_gates_the_match() {
    let options = RouteOptions::builder()
        .constraints(ConstraintSpec::predicate(|bindings: &Bindings| {
            bindings
                .get("n")
                .and_then(BoundValue::as_single)
                .is_some_and(|value| value.len() < 3)
        }))
        .build();
    let route = Route::new("/n/:n", options).unwrap();

    assert!(route.matches("/n/42").is_some());
    assert!(route.matches("/n/4242").is_none());
}
