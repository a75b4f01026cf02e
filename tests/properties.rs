//! Property tests over the invariants that hold for any stop list.

mod fixtures;

use std::sync::Arc;

use proptest::prelude::*;

use fixtures::*;
use route_planner::address::{AddressListStore, MIN_ENTRIES};
use route_planner::haversine::StraightLineDirections;
use route_planner::map::MapCanvas;
use route_planner::route::{RouteRequest, RouteStops, Strategy as Router};
use route_planner::solver::parse_solution;
use route_planner::traits::MapCapability;

fn unique_addresses() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[A-Z][a-z]{2,8} (St|Ave|Rd)", 2..8)
        .prop_map(|set| set.into_iter().collect())
}

fn landmark_route() -> impl Strategy<Value = Vec<String>> {
    (2..=LANDMARKS.len())
        .prop_flat_map(|n| Just(addresses(n)).prop_shuffle())
}

#[derive(Debug, Clone)]
enum Edit {
    Append,
    Remove(usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![Just(Edit::Append), (0usize..6).prop_map(Edit::Remove)]
}

proptest! {
    #[test]
    fn shuffled_response_is_accepted(
        (request, ordered) in unique_addresses()
            .prop_flat_map(|addresses| (Just(addresses.clone()), Just(addresses).prop_shuffle()))
    ) {
        let body = serde_json::json!({
            "success": true,
            "orderedLocations": ordered,
            "totalDistance": 1234.5,
            "totalDuration": 321.0,
        })
        .to_string();

        let request = RouteRequest::from_entries(None, &request, Router::Greedy);
        let solution = parse_solution(&body).unwrap();

        prop_assert_eq!(&solution.ordered_addresses, &ordered);
        prop_assert!(solution.ensure_permutation_of(&request).is_ok());
    }

    #[test]
    fn dropped_stop_is_rejected(addresses in unique_addresses()) {
        let request = RouteRequest::from_entries(None, &addresses, Router::Mst);
        let body = serde_json::json!({
            "success": true,
            "orderedLocations": &addresses[1..],
        })
        .to_string();

        let solution = parse_solution(&body).unwrap();
        prop_assert!(solution.ensure_permutation_of(&request).is_err());
    }

    #[test]
    fn rendered_legs_chain_the_stops(ordered in landmark_route()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let geocoder = Arc::new(LookupGeocoder::with_landmarks());
        let mut canvas = MapCanvas::new(StraightLineDirections::new(geocoder));
        let stops = RouteStops::from_ordered(&ordered).unwrap();

        let route = runtime.block_on(canvas.render_route(&stops)).unwrap();

        prop_assert_eq!(route.legs.len(), ordered.len() - 1);
        for (i, leg) in route.legs.iter().enumerate() {
            prop_assert_eq!(leg.step, i + 1);
            prop_assert_eq!(&leg.start_label, &ordered[i]);
            prop_assert_eq!(&leg.end_label, &ordered[i + 1]);
            prop_assert!(leg.distance_meters >= 0.0);
        }
        for pair in route.legs.windows(2) {
            prop_assert_eq!(&pair[0].end_label, &pair[1].start_label);
        }
    }

    #[test]
    fn store_never_drops_below_minimum(edits in prop::collection::vec(edit(), 0..40)) {
        let mut store = AddressListStore::new();
        for edit in edits {
            match edit {
                Edit::Append => store.append(),
                Edit::Remove(index) => {
                    let before = store.len();
                    match store.remove_at(index) {
                        Ok(_) => prop_assert_eq!(store.len(), before - 1),
                        Err(_) => prop_assert_eq!(store.len(), before),
                    }
                }
            }
            prop_assert!(store.len() >= MIN_ENTRIES);
        }
    }
}
