//! Lifeline allocation.
//!
//! Discovers every application referenced by the process tree, orders them
//! alphabetically and assigns each a fixed horizontal slot. Header anchors are
//! emitted up front; footers wait until the walker has measured the whole
//! diagram, at which point [`Lifelines::finalize`] places them and records the
//! realized lifeline length on each header.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use procession_core::{
    geometry::Point,
    identifier::{ActivityId, ApplicationId, NodeId},
    model::{ActivityContext, Application, BusinessProcess, Interface, InternalActivity},
};

use crate::{
    config::LayoutConfig,
    diagram::{LayoutNode, LifelinePayload, NodeKind, NodePayload},
};

const LIFELINE_Z_INDEX: i32 = 50;

/// Resolves application references to application records.
///
/// Lookup order: for activities, the caller's current-process activity list
/// first; then the record inlined on the interface or activity; then the
/// diagram's application catalog by id.
#[derive(Debug, Default)]
pub(crate) struct ApplicationResolver<'a> {
    catalog: HashMap<ApplicationId, &'a Application>,
    activity_applications: HashMap<ActivityId, &'a Application>,
    context_applications: Vec<&'a Application>,
}

impl<'a> ApplicationResolver<'a> {
    pub(crate) fn new(catalog: &'a [Application], activities: &'a [ActivityContext]) -> Self {
        let mut activity_applications = HashMap::new();
        let mut context_applications = Vec::new();
        for context in activities {
            if let Some(application) = &context.application {
                activity_applications
                    .entry(context.activity.id)
                    .or_insert(application);
                context_applications.push(application);
            }
        }

        Self {
            catalog: catalog.iter().map(|app| (app.id, app)).collect(),
            activity_applications,
            context_applications,
        }
    }

    fn by_reference(
        &self,
        inline: Option<&'a Application>,
        id: Option<ApplicationId>,
    ) -> Option<&'a Application> {
        inline.or_else(|| id.and_then(|id| self.catalog.get(&id).copied()))
    }

    pub(crate) fn provider(&self, interface: &'a Interface) -> Option<&'a Application> {
        self.by_reference(
            interface.provider.as_ref(),
            interface.provider_application_id,
        )
    }

    pub(crate) fn consumer(&self, interface: &'a Interface) -> Option<&'a Application> {
        self.by_reference(
            interface.consumer.as_ref(),
            interface.consumer_application_id,
        )
    }

    pub(crate) fn activity(&self, activity: &'a InternalActivity) -> Option<&'a Application> {
        self.activity_applications
            .get(&activity.id)
            .copied()
            .or_else(|| self.by_reference(activity.application.as_ref(), activity.application_id))
    }
}

/// Applications in slot order, with their horizontal positions.
#[derive(Debug)]
pub(crate) struct Lifelines<'a> {
    applications: Vec<&'a Application>,
    slots: HashMap<ApplicationId, usize>,
    base_x: f32,
    lane_spacing: f32,
    header_y: f32,
    footer_inset: f32,
}

impl<'a> Lifelines<'a> {
    /// Collects and orders every application the tree references.
    pub(crate) fn allocate(
        processes: &'a [BusinessProcess],
        resolver: &ApplicationResolver<'a>,
        config: &LayoutConfig,
    ) -> Self {
        let mut found: IndexMap<ApplicationId, &'a Application> = IndexMap::new();
        for process in processes {
            collect_applications(process, resolver, &mut found);
        }
        for application in &resolver.context_applications {
            found.entry(application.id).or_insert(*application);
        }

        let mut applications: Vec<_> = found.into_values().collect();
        applications.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let slots = applications
            .iter()
            .enumerate()
            .map(|(slot, app)| (app.id, slot))
            .collect();

        debug!(applications = applications.len(); "Allocated lifeline slots");

        Self {
            applications,
            slots,
            base_x: config.base_x(),
            lane_spacing: config.lane_spacing(),
            header_y: config.header_y(),
            footer_inset: config.footer_inset(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.applications.len()
    }

    /// Applications in slot order.
    pub(crate) fn applications(&self) -> impl Iterator<Item = &'a Application> + '_ {
        self.applications.iter().copied()
    }

    /// X position of the lifeline of `application`, if it has a slot.
    pub(crate) fn x_of(&self, application: ApplicationId) -> Option<f32> {
        self.slots
            .get(&application)
            .map(|&slot| self.slot_x(slot))
    }

    fn slot_x(&self, slot: usize) -> f32 {
        self.base_x + slot as f32 * self.lane_spacing
    }

    /// Header anchors at the fixed top y, one per application.
    ///
    /// The lifeline length is unknown at this point and is filled in by
    /// [`Lifelines::finalize`].
    pub(crate) fn header_nodes(&self) -> Vec<LayoutNode> {
        self.applications()
            .enumerate()
            .map(|(slot, app)| {
                let position = Point::new(self.slot_x(slot), self.header_y);
                LayoutNode::new(
                    NodeId::LifelineHeader(app.id),
                    NodeKind::LifelineHeader,
                    position,
                    NodePayload::Lifeline(LifelinePayload {
                        application: app.clone(),
                        lifeline_height: 0.0,
                        header_position: position,
                        footer_position: position,
                    }),
                )
                .with_z_index(LIFELINE_Z_INDEX)
            })
            .collect()
    }

    /// Records the realized lifeline length on each header and returns the
    /// footer anchors placed at `total_height`.
    pub(crate) fn finalize(&self, headers: &mut [LayoutNode], total_height: f32) -> Vec<LayoutNode> {
        let footer_y = total_height - self.footer_inset;

        for header in headers.iter_mut() {
            let footer_position = header.position().with_y(footer_y);
            if let NodePayload::Lifeline(payload) = header.payload_mut() {
                payload.lifeline_height = total_height - self.footer_inset;
                payload.footer_position = footer_position;
            }
        }

        self.applications
            .iter()
            .enumerate()
            .map(|(slot, app)| {
                let header_position = Point::new(self.slot_x(slot), self.header_y);
                let position = header_position.with_y(footer_y);
                trace!(application:% = app.id, y = footer_y; "Placed lifeline footer");
                LayoutNode::new(
                    NodeId::LifelineFooter(app.id),
                    NodeKind::LifelineFooter,
                    position,
                    NodePayload::Lifeline(LifelinePayload {
                        application: (*app).clone(),
                        lifeline_height: total_height - 2.0 * self.footer_inset,
                        header_position,
                        footer_position: position,
                    }),
                )
                .with_z_index(LIFELINE_Z_INDEX)
            })
            .collect()
    }
}

fn collect_applications<'a>(
    process: &'a BusinessProcess,
    resolver: &ApplicationResolver<'a>,
    found: &mut IndexMap<ApplicationId, &'a Application>,
) {
    for interface in &process.interfaces {
        let endpoints = [resolver.provider(interface), resolver.consumer(interface)];
        for application in endpoints.into_iter().flatten() {
            found.entry(application.id).or_insert(application);
        }
    }

    for activity in &process.internal_activities {
        if let Some(application) = resolver.activity(activity) {
            found.entry(application.id).or_insert(application);
        }
    }

    for child in &process.child_processes {
        collect_applications(child, resolver, found);
    }
}
