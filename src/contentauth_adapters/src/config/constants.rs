pub mod env {
    pub const CONFIG_ENV_PREFIX: &str = "CONTENTAUTH";
    pub const CONFIG_ENV_SEPARATOR: &str = "__";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const TURNSTILE_SECRET_KEY_ENV_VAR: &str = "TURNSTILE_SECRET_KEY";
    pub const ALLOWED_ORIGINS_ENV_VAR: &str = "CONTENTAUTH_ALLOWED_ORIGINS";
}

/// Optional settings file, resolved relative to the working directory.
pub const CONFIG_FILE: &str = "config/default";

pub const AUTH_BASE_PATH: &str = "/api/auth";
pub const DEFAULT_NORMALIZED_EMAIL_COLUMN: &str = "normalized_email";

/// Largest request body the hook middleware buffers.
pub const MAX_HOOK_BODY_BYTES: usize = 64 * 1024;

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub mod turnstile {
        use std::time::Duration;

        pub const BASE_URL: &str = "https://challenges.cloudflare.com";
        pub const TIMEOUT: Duration = Duration::from_secs(10);
    }
    pub mod postgres {
        pub const MAX_CONNECTIONS: u32 = 5;
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub mod turnstile {
        use std::time::Duration;

        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
