//! Route planning orchestration.
//!
//! [`RoutePlanner`] owns the address list and the map, drives the geocoder and
//! the solver backend, and keeps the step list and totals shown to the user
//! consistent with what is drawn.
//!
//! Computing a route is split so a host event loop can interleave requests:
//! [`RoutePlanner::begin_route`] issues a [`RouteTicket`], the ticket performs
//! the network call without borrowing the planner, and
//! [`RoutePlanner::finish_route`] applies the result only if no newer request
//! was issued in between.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::address::{self, AddressListStore, Waypoint};
use crate::error::{AddressError, PlanError, SolveError};
use crate::map::MapHandle;
use crate::route::{Leg, RouteRequest, RouteSolution, RouteStops, Strategy};
use crate::traits::{Geocoder, MapCapability, MapView, Marker, RouteSolver};

/// What happens to existing markers on a "mark on map" action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerPolicy {
    #[default]
    ClearBeforePlace,
    Accumulate,
}

#[derive(Debug, Clone, Default)]
pub struct PlannerOptions {
    /// Start address prepended to every request and mark action.
    pub fixed_origin: Option<String>,
    pub marker_policy: MarkerPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting { generation: u64 },
    Rendering { generation: u64 },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Transport,
    SolverRejected,
    MalformedResponse,
    Render,
    Geocode,
    MapUnavailable,
}

/// A user-visible message. Each failed action produces exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn for_error(err: &PlanError, strategy: Option<Strategy>) -> Self {
        let router = strategy.map(|s| format!("{} ", s.display_name())).unwrap_or_default();
        let (kind, message) = match err {
            PlanError::InsufficientLocations { .. }
            | PlanError::Solve(SolveError::InsufficientLocations { .. }) => (
                NoticeKind::Validation,
                "Please enter at least two locations.".to_string(),
            ),
            PlanError::Solve(SolveError::Transport(_)) => (
                NoticeKind::Transport,
                format!("Error fetching {}route. Please try again.", router),
            ),
            PlanError::Solve(SolveError::Rejected(message)) => {
                (NoticeKind::SolverRejected, message.clone())
            }
            PlanError::Solve(SolveError::MalformedResponse(_)) => (
                NoticeKind::MalformedResponse,
                format!("Received an invalid route from the {}service.", router),
            ),
            PlanError::Render(failure) => (
                NoticeKind::Render,
                format!("Directions request failed due to {}", failure.status),
            ),
            PlanError::MapNotInitialized => (
                NoticeKind::MapUnavailable,
                "The map is not ready yet.".to_string(),
            ),
        };
        Self { kind, message }
    }
}

/// Step list and totals for the most recent route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteView {
    pub strategy: Option<Strategy>,
    pub legs: Vec<Leg>,
    pub total_distance_meters: Option<f64>,
    pub total_duration_seconds: Option<f64>,
}

impl RouteView {
    pub fn title(&self) -> String {
        match self.strategy {
            Some(strategy) => format!("Route Order: ({})", strategy.display_name()),
            None => "Route Order:".to_string(),
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{:.2} KM", self.total_distance_meters.unwrap_or(0.0) / 1000.0)
    }

    pub fn duration_label(&self) -> String {
        format!("{:.2} Mins", self.total_duration_seconds.unwrap_or(0.0) / 60.0)
    }

    pub fn step_lines(&self) -> Vec<String> {
        self.legs
            .iter()
            .map(|leg| format!("Step {}: {} → {}", leg.step, leg.start_label, leg.end_label))
            .collect()
    }
}

/// An issued route request, ready to be sent to the solver.
pub struct RouteTicket<S> {
    generation: u64,
    request: RouteRequest,
    solver: Arc<S>,
}

impl<S: RouteSolver> RouteTicket<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &RouteRequest {
        &self.request
    }

    pub async fn solve(self) -> SolvedRoute {
        let result = self.solver.solve(&self.request).await;
        SolvedRoute {
            generation: self.generation,
            request: self.request,
            result,
        }
    }
}

/// A solver answer tagged with the generation and request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedRoute {
    pub generation: u64,
    pub request: RouteRequest,
    pub result: Result<RouteSolution, SolveError>,
}

impl SolvedRoute {
    pub fn strategy(&self) -> Strategy {
        self.request.strategy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The route was drawn and the view updated.
    Rendered,
    /// A newer request was issued; this result was discarded.
    Superseded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkSummary {
    pub placed: usize,
    pub failed: usize,
}

pub struct RoutePlanner<S, G, M> {
    addresses: AddressListStore,
    options: PlannerOptions,
    solver: Arc<S>,
    geocoder: Arc<G>,
    map: MapHandle<M>,
    phase: Phase,
    generation: u64,
    view: RouteView,
    notices: Vec<Notice>,
}

impl<S, G, M> RoutePlanner<S, G, M>
where
    S: RouteSolver,
    G: Geocoder,
    M: MapCapability,
{
    pub fn new(solver: Arc<S>, geocoder: Arc<G>, map: M, options: PlannerOptions) -> Self {
        Self {
            addresses: AddressListStore::new(),
            options,
            solver,
            geocoder,
            map: MapHandle::new(map),
            phase: Phase::Idle,
            generation: 0,
            view: RouteView::default(),
            notices: Vec::new(),
        }
    }

    pub fn addresses(&self) -> &AddressListStore {
        &self.addresses
    }

    pub fn set_address(&mut self, index: usize, value: impl Into<String>) -> Result<(), AddressError> {
        self.addresses.set_at(index, value)
    }

    pub fn add_address(&mut self) {
        self.addresses.append();
    }

    pub fn remove_address(&mut self, index: usize) -> Result<String, AddressError> {
        self.addresses.remove_at(index)
    }

    pub fn fixed_origin(&self) -> Option<&str> {
        self.options.fixed_origin.as_deref()
    }

    /// Stops a route request would currently contain, with their roles.
    pub fn waypoints(&self) -> Vec<Waypoint> {
        address::waypoints(self.stop_addresses().as_slice())
    }

    pub fn mount(&mut self, view: &MapView) {
        self.map.initialize(view);
    }

    /// Tears the map down. Requests still in flight come back superseded.
    pub fn unmount(&mut self) {
        self.map.dispose();
        self.generation += 1;
        if self.phase != Phase::Idle {
            self.transition(Phase::Idle);
        }
    }

    pub fn map(&self) -> &MapHandle<M> {
        &self.map
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &RouteView {
        &self.view
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn stop_addresses(&self) -> Vec<String> {
        RouteRequest::from_entries(
            self.options.fixed_origin.as_deref(),
            self.addresses.entries(),
            Strategy::Greedy,
        )
        .addresses
    }

    /// Geocodes every filled entry and pins it on the map, in entry order.
    /// Blank entries are never sent to the geocoder.
    pub async fn mark_addresses(&mut self) -> Result<MarkSummary, PlanError> {
        if !self.map.is_initialized() {
            return Err(self.reject(PlanError::MapNotInitialized, None));
        }

        let addresses = self.stop_addresses();
        let geocoder = Arc::clone(&self.geocoder);
        let results = join_all(addresses.iter().map(|address| geocoder.resolve(address))).await;

        if self.options.marker_policy == MarkerPolicy::ClearBeforePlace {
            self.map.surface_mut().clear_markers();
        }

        let mut summary = MarkSummary::default();
        for (address, result) in addresses.into_iter().zip(results) {
            match result {
                Ok(position) => {
                    self.map.surface_mut().place_marker(Marker {
                        position,
                        label: address,
                    });
                    summary.placed += 1;
                }
                Err(err) => {
                    warn!(%address, error = %err, "geocoding failed");
                    self.notices.push(Notice {
                        kind: NoticeKind::Geocode,
                        message: format!(
                            "Geocoding failed for: {} with status: {}",
                            address,
                            err.status()
                        ),
                    });
                    summary.failed += 1;
                }
            }
        }

        debug!(placed = summary.placed, failed = summary.failed, "addresses marked");
        Ok(summary)
    }

    /// Validates the current entries and issues a new request generation.
    ///
    /// Totals and steps are cleared and the previously drawn route removed
    /// before the new result lands.
    pub fn begin_route(&mut self, strategy: Strategy) -> Result<RouteTicket<S>, PlanError> {
        let request = RouteRequest::from_entries(
            self.options.fixed_origin.as_deref(),
            self.addresses.entries(),
            strategy,
        );
        if request.addresses.len() < 2 {
            let found = request.addresses.len();
            return Err(self.reject(PlanError::InsufficientLocations { found }, Some(strategy)));
        }
        if !self.map.is_initialized() {
            return Err(self.reject(PlanError::MapNotInitialized, Some(strategy)));
        }

        self.generation += 1;
        let generation = self.generation;

        self.view = RouteView {
            strategy: Some(strategy),
            ..RouteView::default()
        };
        self.map.surface_mut().clear_route();
        self.transition(Phase::Requesting { generation });

        Ok(RouteTicket {
            generation,
            request,
            solver: Arc::clone(&self.solver),
        })
    }

    /// Applies a solver answer if it belongs to the latest request.
    pub async fn finish_route(&mut self, solved: SolvedRoute) -> Result<RouteOutcome, PlanError> {
        if solved.generation != self.generation {
            debug!(
                stale = solved.generation,
                current = self.generation,
                "discarding superseded route result"
            );
            return Ok(RouteOutcome::Superseded);
        }

        let strategy = Some(solved.strategy());
        let solution = match solved.result {
            Ok(solution) => solution,
            Err(err) => return Err(self.fail(err.into(), strategy)),
        };
        if let Err(err) = solution.ensure_permutation_of(&solved.request) {
            return Err(self.fail(err.into(), strategy));
        }

        let Some(stops) = RouteStops::from_ordered(&solution.ordered_addresses) else {
            let err = SolveError::MalformedResponse("fewer than two ordered locations".to_string());
            return Err(self.fail(err.into(), strategy));
        };
        if !self.map.is_initialized() {
            return Err(self.fail(PlanError::MapNotInitialized, strategy));
        }

        self.transition(Phase::Rendering {
            generation: solved.generation,
        });

        match self.map.surface_mut().render_route(&stops).await {
            Ok(rendered) => {
                self.view.legs = rendered.legs;
                self.view.total_distance_meters = Some(solution.total_distance_meters);
                self.view.total_duration_seconds = Some(solution.total_duration_seconds);
                info!(
                    strategy = %solved.request.strategy,
                    steps = self.view.legs.len(),
                    distance = %self.view.distance_label(),
                    duration = %self.view.duration_label(),
                    "route ready"
                );
                self.transition(Phase::Idle);
                Ok(RouteOutcome::Rendered)
            }
            Err(failure) => {
                self.map.surface_mut().clear_route();
                Err(self.fail(failure.into(), strategy))
            }
        }
    }

    /// Issues a request, waits for the solver and applies the result.
    pub async fn compute_route(&mut self, strategy: Strategy) -> Result<RouteOutcome, PlanError> {
        let ticket = self.begin_route(strategy)?;
        let solved = ticket.solve().await;
        self.finish_route(solved).await
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "planner phase");
        self.phase = next;
    }

    /// Failure of the current request: Failed, then back to Idle.
    fn fail(&mut self, err: PlanError, strategy: Option<Strategy>) -> PlanError {
        warn!(error = %err, "route request failed");
        self.notices.push(Notice::for_error(&err, strategy));
        self.transition(Phase::Failed);
        self.transition(Phase::Idle);
        err
    }

    /// Rejection before any request is issued. An in-flight request keeps
    /// its phase.
    fn reject(&mut self, err: PlanError, strategy: Option<Strategy>) -> PlanError {
        warn!(error = %err, "action rejected");
        self.notices.push(Notice::for_error(&err, strategy));
        if self.phase == Phase::Idle {
            self.transition(Phase::Failed);
            self.transition(Phase::Idle);
        }
        err
    }
}
