//! Activation Aggregator
//!
//! One Activation per order, assembled in ten sequential steps. Every
//! store read depends on the previous step's result, so the joins run
//! strictly sequentially and nothing is cached across orders - two
//! orders on the same site re-read it.

use tracing::{debug, warn};

use flex_core::{
    window, Activation, Aggregator, AssetKind, Bid, Endpoint, EndpointFilter, MeteringFilter,
    MeteringRecord, OrderBySiteActivationDocument, Organization, OrganizationRole, Point,
    Schedule, ScheduleFilter, Site, VoltageType,
};
use flex_store::AssetRepository;

use crate::error::ActivationResult;

/// Fixed tolerance applied to both window bounds when clipping the
/// metering and schedule series. Absorbs clock and metering-granularity
/// skew between the order window and the 30-minute/hourly telemetry.
pub const ACTIVATION_MARGIN_SECS: i64 = 3600;

/// Builds consolidated activation views from orders
#[derive(Clone)]
pub struct ActivationAggregator {
    repository: AssetRepository,
}

impl ActivationAggregator {
    pub fn new(repository: AssetRepository) -> Self {
        Self { repository }
    }

    /// Build one Activation per order, in order
    pub async fn build_all(
        &self,
        orders: &[OrderBySiteActivationDocument],
        caller: &Organization,
    ) -> ActivationResult<Vec<Activation>> {
        let mut activations = Vec::with_capacity(orders.len());
        for order in orders {
            activations.push(self.build(order, caller).await?);
        }
        Ok(activations)
    }

    /// Build the consolidated view for one order
    pub async fn build(
        &self,
        order: &OrderBySiteActivationDocument,
        caller: &Organization,
    ) -> ActivationResult<Activation> {
        // Step 1: activation window from the lifecycle log. An absent
        // end entry leaves the window open above.
        let window_start = order.window_start();
        let window_end = order.window_end();

        // Step 2: resolve the site; without it every derived field
        // defaults and the order is kept, not dropped.
        let site: Option<Site> = self.repository.try_get(&order.site_id).await?;
        let Some(site) = site else {
            warn!(order_id = %order.order_id, site_id = %order.site_id, "order site unresolved");
            let mut activation = Activation::unresolved(order.log_orders.clone());
            attach_order_fields(&mut activation, order, caller);
            return Ok(activation);
        };

        // Step 3: aggregator identity and the endpoints wired to the
        // site. The endpoint with the smallest registry id is the one
        // schedules are joined through.
        let aggregator: Option<Aggregator> = self
            .repository
            .try_get(&site.eda_registered_resource_id)
            .await?;
        let endpoint_filter = EndpointFilter {
            site_id: Some(site.site_id.clone()),
        };
        let mut endpoints: Vec<Endpoint> = self
            .repository
            .query(AssetKind::Endpoint, &endpoint_filter.to_selector())
            .await?;
        endpoints.sort_by(|a, b| a.edp_registered_resource_id.cmp(&b.edp_registered_resource_id));
        let endpoint = endpoints.into_iter().next();

        // Steps 4-5: the voltage class picks the metering collection;
        // one shared overlap filter serves both classes.
        let metering_kind = match site.voltage_type {
            VoltageType::MV => AssetKind::MeteringRecordMv,
            VoltageType::HV => AssetKind::MeteringRecordHv,
        };
        let metering_filter =
            MeteringFilter::overlapping(site.site_id.clone(), &window_start, &window_end);
        let records: Vec<MeteringRecord> = self
            .repository
            .query(metering_kind, &metering_filter.to_selector())
            .await?;
        let mut metering_points: Vec<Point> =
            records.into_iter().flat_map(|r| r.points).collect();
        window::sort_points(&mut metering_points);

        // Step 6: attach the first bid fully covering the measured span.
        let bid = match (&aggregator, metering_points.first(), metering_points.last()) {
            (Some(aggregator), Some(first), Some(last)) => {
                self.select_covering_bid(aggregator, first, last).await?
            }
            _ => None,
        };

        // Step 7: schedules joined through the endpoint, kept only when
        // at least one of their points overlaps the order window.
        let (schedule_ids, mut schedule_points) = match &endpoint {
            Some(endpoint) => {
                self.collect_schedules(endpoint, &window_start, &window_end)
                    .await?
            }
            None => (Vec::new(), Vec::new()),
        };
        window::sort_points(&mut schedule_points);

        // Steps 8-9: identical clip and re-index for both series.
        let metering_points = window::reindex(window::clip(
            metering_points,
            &window_start,
            &window_end,
            ACTIVATION_MARGIN_SECS,
        ));
        let schedule_points = window::reindex(window::clip(
            schedule_points,
            &window_start,
            &window_end,
            ACTIVATION_MARGIN_SECS,
        ));

        debug!(
            order_id = %order.order_id,
            site_id = %site.site_id,
            metering_count = metering_points.len(),
            schedule_count = schedule_points.len(),
            bid = bid.is_some(),
            "activation assembled"
        );

        // Step 10: assembly, with order identity redacted for producers.
        let mut activation = Activation {
            eda_name: aggregator
                .as_ref()
                .map(|a| a.eda_name.clone())
                .unwrap_or_else(|| flex_core::UNRESOLVED.to_string()),
            eda_registered_resource_id: aggregator
                .as_ref()
                .map(|a| a.eda_registered_resource_id.clone())
                .unwrap_or_else(|| flex_core::UNRESOLVED.to_string()),
            metering_point_mrid: site.metering_point_mrid.clone(),
            voltage_type: site.voltage_type.as_str().to_string(),
            bid_registered_resource_mrid: bid
                .as_ref()
                .map(|b| b.registered_resource_mrid.clone())
                .unwrap_or_else(|| flex_core::UNRESOLVED.to_string()),
            order_date: order.created_date_short(),
            order_time: order.created_time_short(),
            schedule_ids,
            schedule_points,
            metering_points,
            log_orders: order.log_orders.clone(),
            order_id: None,
            order_value: None,
        };
        attach_order_fields(&mut activation, order, caller);
        Ok(activation)
    }

    /// First bid of the aggregator whose interval fully covers the
    /// measured span. None covering is not an error - the view simply
    /// carries no bid.
    async fn select_covering_bid(
        &self,
        aggregator: &Aggregator,
        first: &Point,
        last: &Point,
    ) -> ActivationResult<Option<Bid>> {
        let filter = flex_core::BidFilter {
            eda_registered_resource_id: Some(aggregator.eda_registered_resource_id.clone()),
            ..Default::default()
        };
        let mut bids: Vec<Bid> = self
            .repository
            .query(AssetKind::Bid, &filter.to_selector())
            .await?;
        bids.sort_by(|a, b| a.bid_id.cmp(&b.bid_id));
        Ok(bids
            .into_iter()
            .find(|bid| bid.covers(&first.time_stamp_start, &last.time_stamp_end)))
    }

    /// Schedules for one endpoint within the window, reduced to the ones
    /// actually overlapping it; returns their ids and concatenated points.
    async fn collect_schedules(
        &self,
        endpoint: &Endpoint,
        window_start: &str,
        window_end: &str,
    ) -> ActivationResult<(Vec<String>, Vec<Point>)> {
        let filter = ScheduleFilter::overlapping(
            endpoint.edp_registered_resource_id.clone(),
            window_start,
            window_end,
        );
        let mut schedules: Vec<Schedule> = self
            .repository
            .query(AssetKind::Schedule, &filter.to_selector())
            .await?;
        schedules.sort_by(|a, b| a.schedule_id.cmp(&b.schedule_id));

        let mut schedule_ids = Vec::new();
        let mut points = Vec::new();
        for schedule in schedules {
            let overlapping = schedule.points.iter().any(|p| {
                window::overlaps(
                    &p.time_stamp_start,
                    &p.time_stamp_end,
                    window_start,
                    window_end,
                )
            });
            if overlapping {
                schedule_ids.push(schedule.schedule_id.clone());
                points.extend(schedule.points);
            }
        }
        Ok((schedule_ids, points))
    }
}

/// Producers never see the order identity or the ordered value.
fn attach_order_fields(
    activation: &mut Activation,
    order: &OrderBySiteActivationDocument,
    caller: &Organization,
) {
    if caller.role != OrganizationRole::Producer {
        activation.order_id = Some(order.order_id.clone());
        activation.order_value = Some(order.order_value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use flex_core::{LogOrder, LogOrderKind};
    use flex_store::MemoryAssetStore;

    struct World {
        repository: AssetRepository,
        aggregator: ActivationAggregator,
    }

    impl World {
        fn new() -> Self {
            let repository = AssetRepository::new(Arc::new(MemoryAssetStore::new()));
            let aggregator = ActivationAggregator::new(repository.clone());
            Self {
                repository,
                aggregator,
            }
        }
    }

    fn org(id: &str, role: OrganizationRole) -> Organization {
        Organization::new(id, role)
    }

    fn log(kind: LogOrderKind, timestamp: &str) -> LogOrder {
        LogOrder {
            kind,
            creator: "tso-1".to_string(),
            creator_role: OrganizationRole::Tso,
            timestamp: timestamp.to_string(),
            message: String::new(),
        }
    }

    fn order(id: &str, site: &str, logs: Vec<LogOrder>) -> OrderBySiteActivationDocument {
        OrderBySiteActivationDocument {
            order_id: id.to_string(),
            site_id: site.to_string(),
            order_value: "12.5".to_string(),
            created_timestamp: "1700000000".to_string(),
            time_zone: "Europe/Madrid".to_string(),
            log_orders: logs,
        }
    }

    fn site(id: &str, voltage: VoltageType) -> Site {
        Site {
            site_id: id.to_string(),
            voltage_type: voltage,
            a04_registered_resource_mrid: "dso-a".to_string(),
            producer_mrid: "prod-a".to_string(),
            eda_registered_resource_id: "eda-1".to_string(),
            metering_point_mrid: format!("MP-{}", id),
        }
    }

    fn eda() -> Aggregator {
        Aggregator {
            eda_registered_resource_id: "eda-1".to_string(),
            a46_name: "bsp-x".to_string(),
            eda_name: "EDA One".to_string(),
        }
    }

    fn hv_record(id: &str, site: &str, points: Vec<Point>) -> MeteringRecord {
        MeteringRecord {
            metering_id: id.to_string(),
            site_id: site.to_string(),
            time_interval_start: "0".to_string(),
            time_interval_end: "4000".to_string(),
            resolution: "PT30M".to_string(),
            points,
        }
    }

    #[tokio::test]
    async fn test_windowed_metering_point_survives_and_reindexes() {
        let world = World::new();
        world
            .repository
            .create(AssetKind::Site, &site("S1", VoltageType::HV))
            .await
            .unwrap();
        world.repository.create(AssetKind::Aggregator, &eda()).await.unwrap();
        world
            .repository
            .create(
                AssetKind::MeteringRecordHv,
                &hv_record("H1", "S1", vec![Point::new("7", "5", "960", "1040")]),
            )
            .await
            .unwrap();

        let order = order(
            "O1",
            "S1",
            vec![log(LogOrderKind::Reception, "1000"), log(LogOrderKind::End, "2000")],
        );
        let activation = world
            .aggregator
            .build(&order, &org("tso-1", OrganizationRole::Tso))
            .await
            .unwrap();

        // Inside [1000-3600, 2000+3600]; original id discarded.
        assert_eq!(activation.metering_points.len(), 1);
        assert_eq!(activation.metering_points[0].point_id, "1");
        assert_eq!(activation.metering_points[0].quantity, "5");
        assert_eq!(activation.voltage_type, "HV");
        assert_eq!(activation.eda_name, "EDA One");
        assert_eq!(activation.order_id.as_deref(), Some("O1"));
    }

    #[tokio::test]
    async fn test_points_outside_margin_are_clipped() {
        let world = World::new();
        world
            .repository
            .create(AssetKind::Site, &site("S1", VoltageType::HV))
            .await
            .unwrap();
        world
            .repository
            .create(
                AssetKind::MeteringRecordHv,
                &hv_record(
                    "H1",
                    "S1",
                    vec![
                        Point::new("1", "5", "960", "1040"),
                        Point::new("2", "6", "9000", "9100"),
                    ],
                ),
            )
            .await
            .unwrap();

        let order = order(
            "O1",
            "S1",
            vec![log(LogOrderKind::Reception, "1000"), log(LogOrderKind::End, "2000")],
        );
        let activation = world
            .aggregator
            .build(&order, &org("tso-1", OrganizationRole::Tso))
            .await
            .unwrap();
        assert_eq!(activation.metering_points.len(), 1);
        assert_eq!(activation.metering_points[0].quantity, "5");
    }

    #[tokio::test]
    async fn test_missing_site_defaults_view() {
        let world = World::new();
        let order = order("O1", "S-ghost", vec![log(LogOrderKind::Reception, "1000")]);

        let activation = world
            .aggregator
            .build(&order, &org("dso-a", OrganizationRole::Dso))
            .await
            .unwrap();
        assert_eq!(activation.eda_name, "-");
        assert_eq!(activation.voltage_type, "-");
        assert!(activation.metering_points.is_empty());
        assert_eq!(activation.log_orders.len(), 1);
        // The order itself is kept, identity included for non-producers.
        assert_eq!(activation.order_id.as_deref(), Some("O1"));
    }

    #[tokio::test]
    async fn test_producer_redaction() {
        let world = World::new();
        let order = order("O1", "S-ghost", vec![]);

        let activation = world
            .aggregator
            .build(&order, &org("prod-a", OrganizationRole::Producer))
            .await
            .unwrap();
        assert_eq!(activation.order_id, None);
        assert_eq!(activation.order_value, None);

        let json = serde_json::to_value(&activation).unwrap();
        assert!(json.get("orderId").is_none());
        assert!(json.get("orderValue").is_none());
    }

    #[tokio::test]
    async fn test_bid_selected_only_when_covering() {
        let world = World::new();
        world
            .repository
            .create(AssetKind::Site, &site("S1", VoltageType::HV))
            .await
            .unwrap();
        world.repository.create(AssetKind::Aggregator, &eda()).await.unwrap();
        world
            .repository
            .create(
                AssetKind::MeteringRecordHv,
                &hv_record("H1", "S1", vec![Point::new("1", "5", "1200", "1800")]),
            )
            .await
            .unwrap();

        let bid = |id: &str, start: &str, end: &str| Bid {
            bid_id: id.to_string(),
            eda_registered_resource_id: "eda-1".to_string(),
            registered_resource_mrid: format!("rr-{}", id),
            time_interval_start: start.to_string(),
            time_interval_end: end.to_string(),
            points: vec![],
        };
        // B1 misses the span, B2 covers it.
        world
            .repository
            .create(AssetKind::Bid, &bid("B1", "1300", "1500"))
            .await
            .unwrap();
        world
            .repository
            .create(AssetKind::Bid, &bid("B2", "1000", "2000"))
            .await
            .unwrap();

        let order = order(
            "O1",
            "S1",
            vec![log(LogOrderKind::Reception, "1000"), log(LogOrderKind::End, "2000")],
        );
        let activation = world
            .aggregator
            .build(&order, &org("tso-1", OrganizationRole::Tso))
            .await
            .unwrap();
        assert_eq!(activation.bid_registered_resource_mrid, "rr-B2");
    }

    #[tokio::test]
    async fn test_no_covering_bid_defaults() {
        let world = World::new();
        world
            .repository
            .create(AssetKind::Site, &site("S1", VoltageType::HV))
            .await
            .unwrap();
        world.repository.create(AssetKind::Aggregator, &eda()).await.unwrap();
        world
            .repository
            .create(
                AssetKind::MeteringRecordHv,
                &hv_record("H1", "S1", vec![Point::new("1", "5", "1200", "1800")]),
            )
            .await
            .unwrap();

        let order = order("O1", "S1", vec![log(LogOrderKind::Reception, "1000")]);
        let activation = world
            .aggregator
            .build(&order, &org("tso-1", OrganizationRole::Tso))
            .await
            .unwrap();
        assert_eq!(activation.bid_registered_resource_mrid, "-");
    }

    #[tokio::test]
    async fn test_schedules_joined_through_endpoint() {
        let world = World::new();
        world
            .repository
            .create(AssetKind::Site, &site("S1", VoltageType::MV))
            .await
            .unwrap();
        world.repository.create(AssetKind::Aggregator, &eda()).await.unwrap();
        world
            .repository
            .create(
                AssetKind::Endpoint,
                &Endpoint {
                    edp_registered_resource_id: "edp-1".to_string(),
                    site_id: "S1".to_string(),
                    edp_name: "EDP One".to_string(),
                },
            )
            .await
            .unwrap();

        let schedule = |id: &str, points: Vec<Point>| Schedule {
            schedule_id: id.to_string(),
            edp_registered_resource_id: "edp-1".to_string(),
            time_interval_start: "0".to_string(),
            time_interval_end: "4000".to_string(),
            points,
        };
        // P1 overlaps the window, P2's schedule does not.
        world
            .repository
            .create(
                AssetKind::Schedule,
                &schedule("P1", vec![Point::new("4", "2", "1100", "1500")]),
            )
            .await
            .unwrap();
        world
            .repository
            .create(
                AssetKind::Schedule,
                &schedule("P2", vec![Point::new("9", "3", "2500", "3000")]),
            )
            .await
            .unwrap();

        let order = order(
            "O1",
            "S1",
            vec![log(LogOrderKind::Reception, "1000"), log(LogOrderKind::End, "2000")],
        );
        let activation = world
            .aggregator
            .build(&order, &org("tso-1", OrganizationRole::Tso))
            .await
            .unwrap();

        assert_eq!(activation.schedule_ids, vec!["P1".to_string()]);
        assert_eq!(activation.schedule_points.len(), 1);
        assert_eq!(activation.schedule_points[0].point_id, "1");
    }

    #[tokio::test]
    async fn test_mv_site_reads_mv_collection() {
        let world = World::new();
        world
            .repository
            .create(AssetKind::Site, &site("S1", VoltageType::MV))
            .await
            .unwrap();
        // Record in the HV collection must not be picked up for an MV site.
        world
            .repository
            .create(
                AssetKind::MeteringRecordHv,
                &hv_record("H1", "S1", vec![Point::new("1", "5", "1100", "1200")]),
            )
            .await
            .unwrap();
        let mv = hv_record("M1", "S1", vec![Point::new("1", "7", "1100", "1200")]);
        world
            .repository
            .create(AssetKind::MeteringRecordMv, &mv)
            .await
            .unwrap();

        let order = order(
            "O1",
            "S1",
            vec![log(LogOrderKind::Reception, "1000"), log(LogOrderKind::End, "2000")],
        );
        let activation = world
            .aggregator
            .build(&order, &org("tso-1", OrganizationRole::Tso))
            .await
            .unwrap();
        assert_eq!(activation.metering_points.len(), 1);
        assert_eq!(activation.metering_points[0].quantity, "7");
    }
}
