//! Map surface and its lifecycle.
//!
//! [`MapCanvas`] is a headless map scene: it keeps the marker set and the
//! currently drawn route, and delegates path finding to a
//! [`DirectionsProvider`]. [`MapHandle`] owns a surface for the lifetime of
//! one mount and makes initialization idempotent.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::RenderFailure;
use crate::polyline::Polyline;
use crate::route::{Leg, RenderedRoute, RouteStops};
use crate::traits::{DirectionsProvider, MapCapability, MapView, Marker};

/// What the surface currently shows for a route.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnRoute {
    pub stops: RouteStops,
    pub path: Polyline,
    pub route: RenderedRoute,
}

pub struct MapCanvas<D> {
    directions: D,
    view: Option<MapView>,
    markers: Vec<Marker>,
    drawn: Option<DrawnRoute>,
}

impl<D: DirectionsProvider> MapCanvas<D> {
    pub fn new(directions: D) -> Self {
        Self {
            directions,
            view: None,
            markers: Vec::new(),
            drawn: None,
        }
    }

    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn drawn_route(&self) -> Option<&DrawnRoute> {
        self.drawn.as_ref()
    }
}

#[async_trait]
impl<D: DirectionsProvider> MapCapability for MapCanvas<D> {
    fn initialize(&mut self, view: &MapView) {
        debug!(container = %view.container_id, zoom = view.zoom, "map initialized");
        self.view = Some(view.clone());
    }

    fn place_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    async fn render_route(&mut self, stops: &RouteStops) -> Result<RenderedRoute, RenderFailure> {
        let directions = self.directions.directions(stops).await?;

        if directions.legs.len() != stops.leg_count() {
            return Err(RenderFailure::new("LEG_COUNT_MISMATCH"));
        }

        let legs = directions
            .legs
            .into_iter()
            .enumerate()
            .map(|(i, leg)| Leg {
                step: i + 1,
                start_label: leg.start_label,
                end_label: leg.end_label,
                distance_meters: leg.distance_meters,
                duration_seconds: leg.duration_seconds,
            })
            .collect();
        let route = RenderedRoute { legs };

        info!(
            legs = route.legs.len(),
            points = directions.geometry.points().len(),
            "route drawn"
        );
        self.drawn = Some(DrawnRoute {
            stops: stops.clone(),
            path: directions.geometry,
            route: route.clone(),
        });

        Ok(route)
    }

    fn clear_route(&mut self) {
        self.drawn = None;
    }

    fn dispose(&mut self) {
        self.markers.clear();
        self.drawn = None;
        self.view = None;
    }
}

/// Owns a map surface and guards its lifecycle with a single flag.
pub struct MapHandle<M> {
    surface: M,
    mounted: Option<MapView>,
}

impl<M: MapCapability> MapHandle<M> {
    pub fn new(surface: M) -> Self {
        Self {
            surface,
            mounted: None,
        }
    }

    /// Initializes the surface once. Mounting an already mounted handle is a
    /// no-op; use [`MapHandle::dispose`] first to remount elsewhere.
    pub fn initialize(&mut self, view: &MapView) {
        if let Some(current) = &self.mounted {
            debug!(container = %current.container_id, "map already initialized");
            return;
        }
        self.surface.initialize(view);
        self.mounted = Some(view.clone());
    }

    pub fn is_initialized(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn dispose(&mut self) {
        if self.mounted.take().is_some() {
            self.surface.dispose();
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Coordinate, Directions, DirectionsLeg};

    /// Echoes the stops back as legs of fixed length.
    struct EchoDirections;

    #[async_trait]
    impl DirectionsProvider for EchoDirections {
        async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure> {
            let labels: Vec<&str> = stops.iter().collect();
            let legs = labels
                .windows(2)
                .map(|pair| DirectionsLeg {
                    start_label: pair[0].to_string(),
                    end_label: pair[1].to_string(),
                    distance_meters: 1000.0,
                    duration_seconds: 60.0,
                })
                .collect();
            Ok(Directions {
                legs,
                geometry: Polyline::default(),
            })
        }
    }

    /// Always returns a single leg regardless of stops.
    struct OneLegDirections;

    #[async_trait]
    impl DirectionsProvider for OneLegDirections {
        async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure> {
            Ok(Directions {
                legs: vec![DirectionsLeg {
                    start_label: stops.origin.clone(),
                    end_label: stops.destination.clone(),
                    distance_meters: 1.0,
                    duration_seconds: 1.0,
                }],
                geometry: Polyline::default(),
            })
        }
    }

    fn stops(values: &[&str]) -> RouteStops {
        let owned: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        RouteStops::from_ordered(&owned).unwrap()
    }

    fn marker(label: &str) -> Marker {
        Marker {
            position: Coordinate::new(37.0, -121.0),
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn render_numbers_steps_from_one() {
        let mut canvas = MapCanvas::new(EchoDirections);
        let route = canvas.render_route(&stops(&["a", "b", "c"])).await.unwrap();

        let steps: Vec<_> = route.legs.iter().map(|leg| leg.step).collect();
        assert_eq!(steps, vec![1, 2]);
        assert_eq!(route.distance_meters(), 2000.0);
        assert_eq!(canvas.drawn_route().unwrap().route, route);
    }

    #[tokio::test]
    async fn leg_count_mismatch_is_render_failure() {
        let mut canvas = MapCanvas::new(OneLegDirections);
        let err = canvas.render_route(&stops(&["a", "b", "c"])).await.unwrap_err();
        assert_eq!(err.status, "LEG_COUNT_MISMATCH");
        assert!(canvas.drawn_route().is_none());
    }

    #[test]
    fn markers_accumulate_until_cleared() {
        let mut canvas = MapCanvas::new(EchoDirections);
        canvas.place_marker(marker("a"));
        canvas.place_marker(marker("a"));
        assert_eq!(canvas.markers().len(), 2);

        canvas.clear_markers();
        assert!(canvas.markers().is_empty());
    }

    #[test]
    fn handle_initializes_once() {
        let mut handle = MapHandle::new(MapCanvas::new(EchoDirections));
        assert!(!handle.is_initialized());

        handle.initialize(&MapView::new("map"));
        handle.initialize(&MapView::new("other"));
        assert!(handle.is_initialized());
        assert_eq!(handle.surface().view().unwrap().container_id, "map");

        handle.dispose();
        assert!(!handle.is_initialized());
        assert!(handle.surface().view().is_none());

        handle.initialize(&MapView::new("other"));
        assert_eq!(handle.surface().view().unwrap().container_id, "other");
    }

    #[test]
    fn dispose_clears_scene() {
        let mut handle = MapHandle::new(MapCanvas::new(EchoDirections));
        handle.initialize(&MapView::default());
        handle.surface_mut().place_marker(marker("a"));
        handle.dispose();
        assert!(handle.surface().markers().is_empty());
    }
}
