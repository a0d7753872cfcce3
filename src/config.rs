use dotenvy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_duration_days: i64,
    pub allowed_origins: Vec<String>,
    pub live_update_url: String,
    pub public_url: String,
    pub port: u16,
    pub rates_api_url: Option<String>,
    pub referral_reward: f64,
    pub matching_game_reward: f64,
    pub match_delay_ms: u64,
    pub payout_delay_ms: u64,
    pub payout_failure_rate: f64,
    pub seed_password: String,
    pub is_development: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let jwt_secret = std::env::var("JWT_SECRET").expect("Missing JWT_SECRET in env");
        let jwt_duration_days = std::env::var("JWT_DURATION_DAYS").map_or(30, |v| {
            v.parse::<i64>()
                .expect("JWT_DURATION_DAYS must be number")
        });

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let live_update_url =
            std::env::var("WEBSOCKET_URL").unwrap_or("/api/notifications/sse".to_string());
        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or("http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();
        let port = std::env::var("PORT").map_or(8080, |v| {
            v.parse::<u16>().expect("PORT must be number")
        });
        let rates_api_url = std::env::var("RATES_API_URL")
            .ok()
            .filter(|v| !v.is_empty());

        let referral_reward = std::env::var("REFERRAL_REWARD").map_or(5.0, |v| {
            v.parse::<f64>().expect("REFERRAL_REWARD must be number")
        });
        let matching_game_reward = std::env::var("MATCHING_GAME_REWARD").map_or(5.0, |v| {
            v.parse::<f64>()
                .expect("MATCHING_GAME_REWARD must be number")
        });
        let match_delay_ms = std::env::var("MATCH_DELAY_MS").map_or(2000, |v| {
            v.parse::<u64>().expect("MATCH_DELAY_MS must be number")
        });
        let payout_delay_ms = std::env::var("PAYOUT_DELAY_MS").map_or(2000, |v| {
            v.parse::<u64>().expect("PAYOUT_DELAY_MS must be number")
        });
        let payout_failure_rate = std::env::var("PAYOUT_FAILURE_RATE").map_or(0.05, |v| {
            parse_failure_rate(&v).expect("PAYOUT_FAILURE_RATE must be a number between 0 and 1")
        });

        let seed_password = std::env::var("SEED_PASSWORD").unwrap_or("admin123".to_string());
        let is_development = std::env::var("DEVELOPMENT")
            .map(|v| v.eq("true"))
            .unwrap_or(false);

        Self {
            jwt_secret,
            jwt_duration_days,
            allowed_origins,
            live_update_url,
            public_url,
            port,
            rates_api_url,
            referral_reward,
            matching_game_reward,
            match_delay_ms,
            payout_delay_ms,
            payout_failure_rate,
            seed_password,
            is_development,
        }
    }
}

fn parse_failure_rate(value: &str) -> Result<f64, String> {
    let rate = value.trim().parse::<f64>().map_err(|err| err.to_string())?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("{rate} is outside 0..=1"));
    }
    Ok(rate)
}
