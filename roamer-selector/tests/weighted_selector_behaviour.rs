//! Behavioural tests for `WeightedSelector` wired to in-memory collaborators.

use std::cell::RefCell;

use geo::Coord;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roamer_core::{
    METRES_PER_MILE, Place, PlaceCatalog, PlaceId, SelectError, Selection, SelectionRequest,
    SelectionRequestValidationError, Selector, UserStateStore,
    test_support::{MemoryCatalog, MemoryUserStateStore, place_north_of},
};
use roamer_selector::WeightedSelector;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const ORIGIN: Coord<f64> = Coord { x: -3.1883, y: 55.9533 };
const USER: &str = "ana";
const SEED: u64 = 42;

/// Shared state for selector scenarios.
#[derive(Debug, Default)]
struct SelectorWorld {
    places: RefCell<Vec<Place>>,
    users: MemoryUserStateStore,
    recent_cafes: RefCell<bool>,
    outcomes: RefCell<Vec<Result<Selection, SelectError>>>,
}

impl SelectorWorld {
    fn request(&self, radius_metres: f64) -> SelectionRequest {
        let state = self.users.user_state(USER).expect("load user state");
        let mut request = state.apply_to(SelectionRequest::new(ORIGIN, radius_metres));
        if *self.recent_cafes.borrow() {
            request = request.with_recent_categories(["cafe", "cafe"].into_iter().collect());
        }
        request
    }

    fn pick(&self, request: &SelectionRequest, times: usize) {
        let catalog = MemoryCatalog::with_places(self.places.borrow().iter().cloned());
        let candidates: Vec<Place> = catalog
            .places_within(request.origin, request.radius_metres.max(0.0))
            .collect();
        let selector = WeightedSelector::new();
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        let outcomes = (0..times)
            .map(|_| selector.select(request, &candidates, &mut rng))
            .collect();
        self.outcomes.replace(outcomes);
    }

    fn picked_ids(&self) -> Vec<String> {
        self.outcomes
            .borrow()
            .iter()
            .map(|outcome| {
                outcome
                    .as_ref()
                    .map(|selection| selection.place.id.to_string())
                    .expect("pick should succeed")
            })
            .collect()
    }

    fn single_error(&self) -> SelectError {
        let outcomes = self.outcomes.borrow();
        assert_eq!(outcomes.len(), 1, "expected a single pick");
        outcomes
            .first()
            .cloned()
            .expect("one outcome")
            .expect_err("pick should fail")
    }
}

#[fixture]
fn world() -> SelectorWorld {
    SelectorWorld::default()
}

#[expect(clippy::float_arithmetic, reason = "radius is expressed in miles")]
fn miles(value: f64) -> f64 {
    value * METRES_PER_MILE
}

#[given("two open cafes at 0.3 and 1.5 miles")]
fn two_cafes(world: &SelectorWorld) {
    world.places.replace(vec![
        place_north_of("near-cafe", ORIGIN, 0.3, "cafe", 4.5).with_open_now(true),
        place_north_of("far-cafe", ORIGIN, 1.5, "cafe", 3.0).with_open_now(true),
    ]);
}

#[given("an open bar rated 2 stars at 0.1 miles")]
fn low_rated_bar(world: &SelectorWorld) {
    world
        .places
        .replace(vec![place_north_of("bar", ORIGIN, 0.1, "bar", 2.0).with_open_now(true)]);
}

#[given("an open gym rated 0 stars at 0.2 miles")]
fn zero_rated_gym(world: &SelectorWorld) {
    world
        .places
        .replace(vec![place_north_of("gym", ORIGIN, 0.2, "gym", 0.0).with_open_now(true)]);
}

#[given("the last two picks were cafes")]
fn recent_cafes(world: &SelectorWorld) {
    world.recent_cafes.replace(true);
}

#[given("the user accepted the nearer cafe")]
fn accepted_near_cafe(world: &SelectorWorld) {
    let near = world
        .places
        .borrow()
        .iter()
        .find(|place| place.id == PlaceId::from("near-cafe"))
        .cloned()
        .expect("near cafe exists");
    world.users.record_visit(USER, &near).expect("record visit");
}

#[when("I pick 4000 times within 2 miles")]
fn pick_many(world: &SelectorWorld) {
    let request = world.request(miles(2.0));
    world.pick(&request, 4_000);
}

#[when("I pick 200 times within 2 miles")]
fn pick_some(world: &SelectorWorld) {
    let request = world.request(miles(2.0));
    world.pick(&request, 200);
}

#[when("I pick once within 2 miles")]
fn pick_once(world: &SelectorWorld) {
    let request = world.request(miles(2.0));
    world.pick(&request, 1);
}

#[when("I pick once accepting any rating within 2 miles")]
fn pick_once_any_rating(world: &SelectorWorld) {
    let request = world.request(miles(2.0)).with_min_rating(0.0);
    world.pick(&request, 1);
}

#[when("I pick once with a radius of minus 5 metres")]
fn pick_negative_radius(world: &SelectorWorld) {
    let request = world.request(-5.0);
    world.pick(&request, 1);
}

#[then("the nearer cafe wins about three quarters of the picks")]
#[expect(clippy::float_arithmetic, reason = "share is a ratio of counts")]
#[expect(clippy::cast_precision_loss, reason = "pick counts are small")]
fn near_cafe_share(world: &SelectorWorld) {
    let ids = world.picked_ids();
    let near = ids.iter().filter(|id| id.as_str() == "near-cafe").count();
    let share = near as f64 / ids.len() as f64;
    assert!((share - 0.75).abs() < 0.04, "near cafe share was {share}");
}

#[then("every pick carries a halved weight")]
fn halved_weights(world: &SelectorWorld) {
    for outcome in world.outcomes.borrow().iter() {
        let selection = outcome.as_ref().expect("pick should succeed");
        let expected = if selection.place.id.as_str() == "near-cafe" {
            0.675
        } else {
            0.225
        };
        assert!(
            (selection.weight - expected).abs() < 1e-9,
            "weight {} for {}",
            selection.weight,
            selection.place.id
        );
    }
}

#[then("no eligible places are found")]
fn no_eligible(world: &SelectorWorld) {
    assert_eq!(world.single_error(), SelectError::NoEligiblePlaces);
}

#[then("the request is rejected as invalid")]
fn rejected(world: &SelectorWorld) {
    assert_eq!(
        world.single_error(),
        SelectError::InvalidRequest(SelectionRequestValidationError::NonPositiveRadius(-5.0))
    );
}

#[then("only the farther cafe is picked")]
fn only_far_cafe(world: &SelectorWorld) {
    let ids = world.picked_ids();
    assert_eq!(ids.len(), 200);
    assert!(ids.iter().all(|id| id == "far-cafe"), "picks: {ids:?}");
}

#[scenario(path = "tests/features/weighted_selector.feature", index = 0)]
fn favoured_near_cafe(world: SelectorWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/weighted_selector.feature", index = 1)]
fn repeated_category_keeps_ratio(world: SelectorWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/weighted_selector.feature", index = 2)]
fn poorly_rated_bar(world: SelectorWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/weighted_selector.feature", index = 3)]
fn negative_radius(world: SelectorWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/weighted_selector.feature", index = 4)]
fn zero_rated_gym_is_skipped(world: SelectorWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/weighted_selector.feature", index = 5)]
fn accepted_place_not_offered(world: SelectorWorld) {
    let _ = world;
}
