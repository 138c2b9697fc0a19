//! Statistics report computed from simulated traces

use ticket_desk_simulator_core_rs::{
    DelayRange, DeskReport, Orchestrator, OrchestratorConfig, Throughput,
};

/// All random delays pinned, so every cycle time is known exactly
fn fixed_config(num_desks: usize, num_customers: usize) -> OrchestratorConfig {
    OrchestratorConfig {
        num_desks,
        num_customers,
        service_duration: 3.0,
        rng_seed: Some(1),
        walk_time: DelayRange::fixed(1.0),
        post_service_delay: DelayRange::fixed(0.5),
        ..OrchestratorConfig::default()
    }
}

fn report_for(config: OrchestratorConfig) -> DeskReport {
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run().unwrap();
    DeskReport::from_trace(&orchestrator.trace()).unwrap()
}

#[test]
fn test_one_customer_per_desk() {
    let report = report_for(fixed_config(2, 2));

    for desk in &report.desks {
        assert_eq!(desk.customers_served, 1);
        assert_eq!(desk.average_cycle_time, 4.5);
        assert_eq!(desk.throughput, Throughput::from_average(4.5));
    }
}

#[test]
fn test_queueing_lengthens_cycle_time() {
    // Cycle times 4.5, 9.0, 13.5
    let report = report_for(fixed_config(1, 3));
    let desk = &report.desks[0];

    assert_eq!(desk.customers_served, 3);
    assert_eq!(desk.average_cycle_time, 9.0);

    let throughput = desk.throughput.unwrap();
    assert_eq!(throughput.per_hour, 400.0);
    assert_eq!(throughput.per_day, 3_200.0);
    assert_eq!(throughput.per_month, 64_000.0);
}

#[test]
fn test_idle_desks_have_no_projection() {
    let report = report_for(fixed_config(4, 2));

    assert_eq!(report.desks.len(), 4);
    assert_eq!(report.total_served(), 2);
    assert!(report.desks[2..].iter().all(|d| d.throughput.is_none()));
}

#[test]
fn test_markdown_lists_every_desk() {
    let text = report_for(fixed_config(3, 6)).render_markdown();

    for desk in 1..=3 {
        assert!(text.contains(&format!("## Desk {}", desk)));
    }
    assert_eq!(text.matches("Number of Customers: 2").count(), 3);
}
