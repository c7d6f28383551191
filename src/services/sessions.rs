//! Redis-backed session store for the per-session visit counter

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SessionsService {
    client: Client,
    ttl_seconds: u64,
}

impl SessionsService {
    /// Create a new session store and verify the connection
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            ttl_seconds,
        })
    }

    fn visits_key(session_id: &str) -> String {
        format!("session:{}:num_visits", session_id)
    }

    /// Record one visit and return the count BEFORE this one. A fresh
    /// session therefore reports 0 while 1 is stored. The counter is a
    /// single atomic INCR so concurrent requests never lose updates;
    /// the TTL slides on every visit and the counter expires with the
    /// session.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let key = Self::visits_key(session_id);
        let after: i64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to update visit counter: {}", e)))?;
        let _: () = conn
            .expire(&key, self.ttl_seconds as i64)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to refresh session expiry: {}", e)))?;

        Ok(after - 1)
    }

    /// Read the current visit count without recording a visit
    pub async fn visit_count(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let count: Option<i64> = conn
            .get(Self::visits_key(session_id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read visit counter: {}", e)))?;

        Ok(count.unwrap_or(0))
    }
}
