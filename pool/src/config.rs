use std::time::Duration;

use crate::PoolError;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Worker threads, and so the maximum number of engine processes alive at once.
    pub workers: usize,

    /// Jobs allowed to wait for a free worker. Zero means a job is only
    /// accepted when a worker is idle.
    pub queue_size: usize,

    /// How long `submit` waits for a result, queueing time included.
    pub job_timeout: Duration,

    /// Positions kept in the result memo. Zero disables it.
    pub memo_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_size: 100,
            job_timeout: Duration::from_secs(5),
            memo_capacity: 0,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.workers == 0 {
            return Err(PoolError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.job_timeout.is_zero() {
            return Err(PoolError::InvalidConfig(
                "job_timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_workers() {
        let config = PoolConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = PoolConfig {
            job_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_queue_is_allowed() {
        let config = PoolConfig {
            queue_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
