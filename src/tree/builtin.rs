//! Built-in hierarchy rendered when no tree file is given.

use super::{NodeSpec, Tree};

fn leaves(names: &[&str]) -> Vec<NodeSpec> {
    names.iter().map(|name| NodeSpec::leaf(*name)).collect()
}

fn agent(name: &str, sub_agents: &[&str]) -> NodeSpec {
    NodeSpec::branch(name, leaves(sub_agents))
}

/// The fixed orchestrator/agent/sub-agent hierarchy.
pub fn orchestrator_spec() -> NodeSpec {
    NodeSpec::branch(
        "Main Orchestrator",
        vec![
            NodeSpec::branch(
                "Static Data Orchestrator",
                vec![
                    agent(
                        "Macroeconomic Data Agent",
                        &[
                            "GDP Trends Sub-Agent",
                            "Trade Indices Sub-Agent",
                            "Currency Volatility Sub-Agent",
                        ],
                    ),
                    agent(
                        "Historical Route Performance Agent",
                        &[
                            "FFA Historical Data Sub-Agent",
                            "Baltic Index Components Sub-Agent",
                            "Seasonal Patterns Sub-Agent",
                        ],
                    ),
                    agent(
                        "Commodity Analysis Agent",
                        &[
                            "Iron Ore Trade Trends Sub-Agent",
                            "Coal Trade Trends Sub-Agent",
                            "Mining Output Analysis Sub-Agent",
                        ],
                    ),
                ],
            ),
            NodeSpec::branch(
                "Dynamic Data Orchestrator",
                vec![
                    agent(
                        "Real-Time Vessel Tracking Agent",
                        &[
                            "AIS Data Parser",
                            "Vessel Availability Sub-Agent",
                            "Ton-Mile Demand Estimator",
                        ],
                    ),
                    agent(
                        "Port Disruption Monitoring Agent",
                        &[
                            "Weather Impact Sub-Agent",
                            "Port Congestion Tracker",
                            "Geopolitical Disruption Sub-Agent",
                        ],
                    ),
                    agent(
                        "Fuel Price and Cost Agent",
                        &["Fuel Price Analysis Sub-Agent", "Fuel Cost Impact Calculator"],
                    ),
                ],
            ),
            NodeSpec::branch(
                "Forecast Orchestrator",
                vec![
                    agent(
                        "Time Series Forecasting Agent",
                        &["Static Data Integration Node", "Dynamic Data Integration Node"],
                    ),
                    agent(
                        "Route-Specific Predictions Agent",
                        &["C3 Predictions Sub-Agent", "C5 Predictions Sub-Agent"],
                    ),
                    agent(
                        "Market Volatility Modeller",
                        &["Monte Carlo Volatility Simulator"],
                    ),
                ],
            ),
            NodeSpec::branch(
                "Scenario Orchestrator",
                vec![
                    agent(
                        "Disruption Scenarios Agent",
                        &[
                            "Port Closure Scenarios",
                            "Geopolitical Shock Scenarios",
                            "Vessel Supply Shock Scenarios",
                        ],
                    ),
                    agent(
                        "Demand Fluctuation Modeller",
                        &[
                            "Commodity Demand Surge Scenarios",
                            "Seasonal Demand Drop Scenarios",
                        ],
                    ),
                    agent(
                        "Black Swan Scenario Agent",
                        &[
                            "Future Trigger Sub-Agent",
                            "Unforeseen High-Impact Event Generator",
                        ],
                    ),
                ],
            ),
            NodeSpec::branch(
                "Insights Orchestrator",
                vec![
                    agent(
                        "Vessel Allocation Agent",
                        &[
                            "Spot vs Contract Decision Sub-Agent",
                            "Vessel Deployment Optimiser",
                        ],
                    ),
                    agent(
                        "Contract Optimisation Agent",
                        &[
                            "Contract Parsing Sub-Agent",
                            "Laytime Penalty Risk Assessment",
                        ],
                    ),
                    agent(
                        "Hedging Strategy Agent",
                        &[
                            "FFA Hedge Recommendations Sub-Agent",
                            "Market Opportunity Identification",
                        ],
                    ),
                ],
            ),
        ],
    )
}

pub fn orchestrator_tree() -> Tree {
    Tree::from_spec(&orchestrator_spec()).with_label("orchestrator hierarchy")
}
