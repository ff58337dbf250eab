//! Record payloads submitted by the create and persistence checks

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFixture {
    /// `{client_name: "TestClient"}`
    Basic,
    /// Minimal record used by the core persistence check
    PersistenceProbe,
    /// Flat numeric fields plus a nested profile object
    BlendedIncome,
    /// Sequence of nested objects with floats and booleans
    StrategySelection,
    /// Only `client_name`, the minimal record shape
    Minimal,
    /// Nested objects and a string sequence, read back after creation
    NestedPersistence,
}

impl RecordFixture {
    pub fn client_name(&self) -> &'static str {
        match self {
            RecordFixture::Basic => "TestClient",
            RecordFixture::PersistenceProbe => "PersistenceProbe",
            RecordFixture::BlendedIncome => "BlendedIncomeUser",
            RecordFixture::StrategySelection => "StrategyTestUser",
            RecordFixture::Minimal => "SimpleUser",
            RecordFixture::NestedPersistence => "PersistenceTestUser",
        }
    }

    /// Request body for POST /status
    pub fn payload(&self) -> Value {
        let client_name = self.client_name();
        match self {
            RecordFixture::Basic | RecordFixture::PersistenceProbe | RecordFixture::Minimal => {
                json!({ "client_name": client_name })
            }
            RecordFixture::BlendedIncome => json!({
                "client_name": client_name,
                "income_type": "blended",
                "w2_income": 150000,
                "business_profit": 350000,
                "combined_income": 500000,
                "w2_percentage": 30,
                "business_percentage": 70,
                "profile_data": {
                    "user_type": "blended",
                    "has_partners": false,
                    "entity_structure": "S-Corp",
                    "capital_available": 250000,
                    "strategy_goals": ["tax_reduction", "wealth_building"]
                }
            }),
            RecordFixture::StrategySelection => json!({
                "client_name": client_name,
                "selected_strategies": [
                    {
                        "id": "f-reorg-c-corp",
                        "name": "F-Reorg to C-Corp",
                        "category": "Setup & Structure",
                        "complexity": "Advanced",
                        "estimated_savings": 45000,
                        "implementation_status": "not_started",
                        "eligibility_met": true,
                        "quantified_example": {
                            "scenario": "High-income business owner",
                            "savings_amount": 45000,
                            "tax_rate_reduction": "15%"
                        }
                    },
                    {
                        "id": "tax-aware-hedge-fund",
                        "name": "Tax-Aware Hedge Fund",
                        "category": "Deduction Strategies",
                        "complexity": "Advanced",
                        "estimated_savings": 75000,
                        "implementation_status": "in_progress",
                        "eligibility_met": true
                    }
                ],
                "total_estimated_savings": 120000,
                "forecast_data": {
                    "time_horizon": 10,
                    "return_rate": 0.08,
                    "wealth_multiplier_enabled": true,
                    "lifetime_impact": 1500000
                }
            }),
            RecordFixture::NestedPersistence => json!({
                "client_name": client_name,
                "income_profile": {
                    "type": "blended",
                    "w2_income": 200000,
                    "business_profit": 300000,
                    "total": 500000
                },
                "strategy_selections": ["qof", "cost-segregation", "installment-sale"],
                "forecast_settings": {
                    "time_horizon": 15,
                    "return_rate": 0.07,
                    "wealth_loop": true
                }
            }),
        }
    }
}
