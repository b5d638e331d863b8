use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use super::{CrisisError, EscalationReport, MarketSupport, Notification, UrgentNeed};
use crate::audit::{AuditEvent, AuditHandle};
use crate::config::CrisisConfig;
use crate::entry::{AidEntry, EntryFilter, EntryStatus, EntryStore, Priority};
use crate::lookup::{Dispatch, DispatchOutcome, LookupCatalog};
use crate::metrics::{DISPATCHES_TOTAL, ENTRIES_ESCALATED, ESCALATIONS_TOTAL};

/// Drives crisis escalation and aid dispatch.
pub struct CrisisCoordinator {
    store: Arc<dyn EntryStore>,
    catalog: Arc<LookupCatalog>,
    config: CrisisConfig,
    audit: Option<AuditHandle>,
}

impl CrisisCoordinator {
    pub fn new(
        store: Arc<dyn EntryStore>,
        catalog: Arc<LookupCatalog>,
        config: CrisisConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            config,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        self.audit = Some(audit);
        self
    }

    async fn emit(&self, event: AuditEvent) {
        if let Some(ref audit) = self.audit {
            audit.emit(event).await;
        }
    }

    /// Put `location` into crisis mode and call in help from nearby cities.
    ///
    /// The snapshot of active entries and the status transition happen in
    /// one store transaction. Dispatch is simulated afterwards and never
    /// rolls the transition back.
    pub async fn escalate(&self, location: &str) -> Result<EscalationReport, CrisisError> {
        let now = Utc::now();
        let snapshot = self.store.escalate_location(location, now)?;

        ESCALATIONS_TOTAL.inc();
        ENTRIES_ESCALATED.inc_by(snapshot.transitioned as u64);

        let (available_resources, urgent_needs) = assess(&snapshot.active_entries);

        let mut logistics_support = Vec::new();
        let mut market_support = Vec::new();
        let dispatch_need = select_dispatch_need(&urgent_needs);

        for city in self.candidate_cities(location) {
            if let Some(need) = dispatch_need {
                if !self.catalog.available_fleets(city).is_empty() {
                    let outcome =
                        self.catalog
                            .dispatch(city, location, &need.product, need.quantity);
                    if let Some(dispatch) = self.record_dispatch(outcome).await {
                        logistics_support.push(dispatch);
                    }
                }
            }

            let markets = self.catalog.available_markets(city);
            if !markets.is_empty() {
                market_support.push(MarketSupport {
                    city: city.to_string(),
                    markets: markets.len(),
                    capacity: markets.iter().map(|m| m.capacity).sum(),
                });
            }
        }

        let total: u64 = available_resources.values().sum();
        let status_updates = vec![
            format!("All aid resources in {} have been mobilised", location),
            format!("{} urgent aid requests detected", urgent_needs.len()),
            format!("{} units of aid supplies available in total", total),
            if urgent_needs.is_empty() {
                "All needs can be covered by available resources".to_string()
            } else {
                "Contacting nearby markets for missing supplies...".to_string()
            },
            if logistics_support.is_empty() {
                "No logistics support needed".to_string()
            } else {
                format!(
                    "Truck support is on the way from {} cities",
                    logistics_support.len()
                )
            },
        ];

        tracing::info!(
            location = %location,
            transitioned = snapshot.transitioned,
            urgent_needs = urgent_needs.len(),
            dispatches = logistics_support.len(),
            "Crisis escalated"
        );

        self.emit(AuditEvent::CrisisEscalated {
            location: location.to_string(),
            transitioned: snapshot.transitioned as u32,
            urgent_needs: urgent_needs.len() as u32,
            available_units: total,
            dispatched_from: logistics_support.iter().map(|d| d.from.clone()).collect(),
        })
        .await;

        Ok(EscalationReport {
            message: "Earthquake simulation started".to_string(),
            location: location.to_string(),
            timestamp: snapshot.activated_at,
            transitioned: snapshot.transitioned,
            available_resources,
            urgent_needs,
            logistics_support,
            market_support,
            status_updates,
        })
    }

    /// Send `amount` of `product` if the source city's markets can cover it.
    ///
    /// Refuses with `insufficient_stock` before any fleet is consulted.
    pub async fn dispatch_help(
        &self,
        from: &str,
        to: &str,
        product: &str,
        amount: u32,
    ) -> DispatchOutcome {
        let available = self.catalog.product_availability(from, product);

        let outcome = if available < amount {
            DispatchOutcome::InsufficientStock {
                message: format!(
                    "Not enough {} in {}. Available: {}, requested: {}",
                    product, from, available, amount
                ),
                available,
                requested: amount,
            }
        } else {
            self.catalog.dispatch(from, to, product, amount)
        };

        if let DispatchOutcome::Dispatched(_) = outcome {
            self.record_dispatch(outcome.clone()).await;
        } else {
            DISPATCHES_TOTAL.with_label_values(&[outcome.status()]).inc();
            tracing::warn!(
                from = %from,
                to = %to,
                product = %product,
                amount,
                status = outcome.status(),
                "Dispatch refused"
            );
            self.emit(AuditEvent::DispatchRejected {
                from: from.to_string(),
                to: to.to_string(),
                product: product.to_string(),
                amount,
                status: outcome.status().to_string(),
                message: outcome.message().to_string(),
            })
            .await;
        }

        outcome
    }

    /// Ask submitters outside `location` whose entries are in crisis mode to
    /// bring supplies.
    pub fn notifications(&self, location: &str) -> Result<Vec<Notification>, CrisisError> {
        let entries = self
            .store
            .list(&EntryFilter::new().with_status(EntryStatus::CrisisMode))?;

        Ok(entries
            .iter()
            .filter(|e| !e.is_at(location))
            .take(self.config.notification_limit)
            .map(|e| Notification {
                to: e.display_name().to_string(),
                city: e.analysis.location_or_unknown().to_string(),
                message: format!(
                    "URGENT! Bring your supplies to the nearest collection point to help the {} disaster zone.",
                    location
                ),
            })
            .collect())
    }

    /// First `max_candidates` of the configured list, minus the target.
    fn candidate_cities<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.config
            .nearby_locations
            .iter()
            .take(self.config.max_candidates)
            .map(String::as_str)
            .filter(move |city| *city != location)
    }

    async fn record_dispatch(&self, outcome: DispatchOutcome) -> Option<Dispatch> {
        DISPATCHES_TOTAL.with_label_values(&[outcome.status()]).inc();

        let DispatchOutcome::Dispatched(dispatch) = outcome else {
            return None;
        };

        tracing::info!(
            from = %dispatch.from,
            to = %dispatch.to,
            product = %dispatch.product,
            amount = dispatch.amount,
            company = %dispatch.company,
            "Aid dispatched"
        );

        self.emit(AuditEvent::AidDispatched {
            from: dispatch.from.clone(),
            to: dispatch.to.clone(),
            product: dispatch.product.clone(),
            amount: dispatch.amount,
            company: dispatch.company.clone(),
            distance_km: dispatch.route.distance,
        })
        .await;

        Some(dispatch)
    }
}

/// Offered units per product, and the high/urgent needs, in entry order.
fn assess(entries: &[AidEntry]) -> (BTreeMap<String, u64>, Vec<UrgentNeed>) {
    let mut resources = BTreeMap::new();
    let mut needs = Vec::new();

    for entry in entries {
        for item in &entry.analysis.items {
            if entry.analysis.is_supply() {
                *resources.entry(item.name.clone()).or_insert(0) += item.quantity as u64;
            } else if Priority::is_urgent(&entry.analysis.priority) {
                needs.push(UrgentNeed {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    product: item.name.clone(),
                    quantity: item.quantity,
                    priority: entry.analysis.priority.clone(),
                });
            }
        }
    }

    (resources, needs)
}

/// Highest-ranked need; the earliest wins a tie.
fn select_dispatch_need(needs: &[UrgentNeed]) -> Option<&UrgentNeed> {
    needs.iter().fold(None, |best: Option<&UrgentNeed>, need| match best {
        Some(current) if current.rank() >= need.rank() => Some(current),
        _ => Some(need),
    })
}
