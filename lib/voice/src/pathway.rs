use std::fmt;
use std::str::FromStr;

use tracing::debug;
use tracing::info;

use crate::exception::Exception;
use crate::exception::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePathway {
    /// created through the speech studio trial flow, only predefined scripts can be synthesized
    Trial,
    /// created through the custom voice api with consent, accepts any text
    Full,
}

impl fmt::Display for VoicePathway {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VoicePathway::Trial => f.write_str("trial"),
            VoicePathway::Full => f.write_str("full"),
        }
    }
}

/// What configuration already knows about where the profile was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathwayHint {
    #[default]
    Auto,
    Trial,
    Full,
}

impl FromStr for PathwayHint {
    type Err = Exception;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(PathwayHint::Auto),
            "trial" => Ok(PathwayHint::Trial),
            "full" => Ok(PathwayHint::Full),
            _ => Err(Exception::InvalidRequest(format!(
                "unknown pathway, pathway={value}, expected auto, trial or full"
            ))),
        }
    }
}

/// Lookup against the service collections that issue speaker profiles.
#[allow(async_fn_in_trait)]
pub trait ProfileRegistry {
    async fn contains_trial_profile(&self, speaker_profile_id: &str) -> Result<bool>;

    async fn contains_personal_voice(&self, speaker_profile_id: &str) -> Result<bool>;
}

pub async fn classify<R>(speaker_profile_id: &str, hint: PathwayHint, registry: &R) -> Result<VoicePathway>
where
    R: ProfileRegistry,
{
    let speaker_profile_id = speaker_profile_id.trim();
    if speaker_profile_id.is_empty() {
        return Err(Exception::InvalidRequest("speaker profile id must not be empty".to_string()));
    }

    let pathway = match hint {
        PathwayHint::Trial => VoicePathway::Trial,
        PathwayHint::Full => VoicePathway::Full,
        PathwayHint::Auto => {
            debug!("lookup trial profile, id={speaker_profile_id}");
            if registry.contains_trial_profile(speaker_profile_id).await? {
                VoicePathway::Trial
            } else {
                debug!("lookup personal voice, id={speaker_profile_id}");
                if registry.contains_personal_voice(speaker_profile_id).await? {
                    VoicePathway::Full
                } else {
                    return Err(Exception::UnknownProfile(speaker_profile_id.to_string()));
                }
            }
        }
    };

    info!("classify speaker profile, id={speaker_profile_id}, hint={hint:?}, pathway={pathway}");
    Ok(pathway)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct MemoryRegistry {
        trial: HashSet<String>,
        personal: HashSet<String>,
        offline: bool,
        lookups: Cell<usize>,
    }

    impl MemoryRegistry {
        fn new(trial: &[&str], personal: &[&str]) -> Self {
            MemoryRegistry {
                trial: trial.iter().map(|id| id.to_string()).collect(),
                personal: personal.iter().map(|id| id.to_string()).collect(),
                ..MemoryRegistry::default()
            }
        }

        fn lookup(&self, collection: &HashSet<String>, id: &str) -> Result<bool> {
            self.lookups.set(self.lookups.get() + 1);
            if self.offline {
                return Err(Exception::synthesis("connection refused"));
            }
            Ok(collection.contains(id))
        }
    }

    impl ProfileRegistry for MemoryRegistry {
        async fn contains_trial_profile(&self, speaker_profile_id: &str) -> Result<bool> {
            self.lookup(&self.trial, speaker_profile_id)
        }

        async fn contains_personal_voice(&self, speaker_profile_id: &str) -> Result<bool> {
            self.lookup(&self.personal, speaker_profile_id)
        }
    }

    #[tokio::test]
    async fn registry_decides_pathway() {
        let registry = MemoryRegistry::new(&["trial-1"], &["5f5c3d2a-0000-4000-8000-000000000001"]);

        let pathway = classify("trial-1", PathwayHint::Auto, &registry).await.unwrap();
        assert_eq!(pathway, VoicePathway::Trial);

        let pathway = classify("5f5c3d2a-0000-4000-8000-000000000001", PathwayHint::Auto, &registry)
            .await
            .unwrap();
        assert_eq!(pathway, VoicePathway::Full);
    }

    #[tokio::test]
    async fn unknown_profile() {
        let registry = MemoryRegistry::new(&["trial-1"], &["full-1"]);
        let error = classify("other", PathwayHint::Auto, &registry).await.unwrap_err();
        assert!(matches!(error, Exception::UnknownProfile(id) if id == "other"));
    }

    #[tokio::test]
    async fn repeated_calls_agree() {
        let registry = MemoryRegistry::new(&["trial-1"], &["full-1"]);
        for _ in 0..3 {
            assert_eq!(classify("full-1", PathwayHint::Auto, &registry).await.unwrap(), VoicePathway::Full);
            assert_eq!(classify("trial-1", PathwayHint::Auto, &registry).await.unwrap(), VoicePathway::Trial);
        }
    }

    #[tokio::test]
    async fn hint_skips_lookup() {
        let registry = MemoryRegistry::new(&[], &[]);
        assert_eq!(classify("abc", PathwayHint::Trial, &registry).await.unwrap(), VoicePathway::Trial);
        assert_eq!(classify("abc", PathwayHint::Full, &registry).await.unwrap(), VoicePathway::Full);
        assert_eq!(registry.lookups.get(), 0);
    }

    #[tokio::test]
    async fn registry_failure_is_not_downgraded() {
        let registry = MemoryRegistry {
            offline: true,
            ..MemoryRegistry::new(&["trial-1"], &[])
        };
        let error = classify("trial-1", PathwayHint::Auto, &registry).await.unwrap_err();
        assert!(matches!(error, Exception::Synthesis { .. }));
    }

    #[tokio::test]
    async fn empty_profile_id() {
        let registry = MemoryRegistry::new(&[], &[]);
        let error = classify(" ", PathwayHint::Auto, &registry).await.unwrap_err();
        assert!(matches!(error, Exception::InvalidRequest(_)));
        assert_eq!(registry.lookups.get(), 0);
    }

    #[test]
    fn parse_hint() {
        assert_eq!("".parse::<PathwayHint>().unwrap(), PathwayHint::Auto);
        assert_eq!("Trial".parse::<PathwayHint>().unwrap(), PathwayHint::Trial);
        assert!("sdk".parse::<PathwayHint>().is_err());
    }
}
