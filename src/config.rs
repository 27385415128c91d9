use dotenvy::dotenv;
use std::env;

use crate::engine::calendar::WorkweekPolicy;
use crate::engine::validator::RuleLimits;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    /// Authoritative working-week definition; see `WorkweekPolicy`.
    pub calendar_policy: WorkweekPolicy,
    pub max_consecutive_days: u32,
    pub weekend_leave_cap: u32,
    pub team_capacity_ceiling: f64,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_api_per_min: u32,

    /// Optional JSON file with teams/employees loaded at startup.
    pub seed_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            calendar_policy: env::var("CALENDAR_POLICY")
                .unwrap_or_else(|_| "fri_sat".to_string())
                .parse()
                .expect("CALENDAR_POLICY must be fri_sat or sat_sun"),
            max_consecutive_days: env::var("MAX_CONSECUTIVE_DAYS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap(),
            weekend_leave_cap: env::var("WEEKEND_LEAVE_CAP")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap(),
            team_capacity_ceiling: env::var("TEAM_CAPACITY_CEILING")
                .unwrap_or_else(|_| "0.49".to_string())
                .parse()
                .unwrap(),

            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            seed_file: env::var("SEED_FILE").ok(),
        }
    }

    pub fn rule_limits(&self) -> RuleLimits {
        RuleLimits {
            max_consecutive_days: self.max_consecutive_days,
            weekend_cap: self.weekend_leave_cap,
            team_capacity_ceiling: self.team_capacity_ceiling,
        }
    }
}
