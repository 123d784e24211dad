use std::str::FromStr;

/// How results contributed by several blocks under the same key are merged
/// before path resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultMergePolicy {
    /// Differing results for one path fail with a configuration error.
    #[default]
    Reject,
    /// The block registered last wins.
    LastWriteWins,
}

impl FromStr for ResultMergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "last-write-wins" | "last_write_wins" => Ok(Self::LastWriteWins),
            other => Err(format!("unknown result merge policy: {other}")),
        }
    }
}

/// Options of the content transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// 128 by default.
    pub max_depth: usize,
    /// [ResultMergePolicy::Reject] by default.
    pub result_merge: ResultMergePolicy,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            result_merge: ResultMergePolicy::default(),
        }
    }
}

impl ContentConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let max_depth = dotenvy::var("CONTENT_MAX_DEPTH")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(default.max_depth);

        let result_merge = dotenvy::var("CONTENT_RESULT_MERGE")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(default.result_merge);

        Self {
            max_depth,
            result_merge,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_result_merge(mut self, result_merge: ResultMergePolicy) -> Self {
        self.result_merge = result_merge;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_policy_parse() {
        assert_eq!("reject".parse(), Ok(ResultMergePolicy::Reject));
        assert_eq!(" Last-Write-Wins ".parse(), Ok(ResultMergePolicy::LastWriteWins));
        assert!("first".parse::<ResultMergePolicy>().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ContentConfig::default()
            .with_max_depth(4)
            .with_result_merge(ResultMergePolicy::LastWriteWins);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.result_merge, ResultMergePolicy::LastWriteWins);
    }
}
