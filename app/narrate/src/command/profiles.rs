use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use voice::azure::AzureSpeech;

use crate::config;

#[derive(Args)]
pub struct Profiles {
    #[arg(long, help = "conf path")]
    conf: Option<PathBuf>,
}

impl Profiles {
    pub async fn execute(&self) -> Result<()> {
        let service = config::load_service(self.conf.as_deref())?;
        let speech = AzureSpeech::new(&service.region, service.api_key);

        let mut profiles = speech.list_trial_profiles().await?;
        profiles.extend(speech.list_personal_voices().await?);

        if profiles.is_empty() {
            println!("no speaker profiles found, region={}", service.region);
            return Ok(());
        }
        println!("{:<6}  {:<40}  {:<12}  name", "type", "speaker_profile_id", "status");
        for profile in profiles {
            println!(
                "{:<6}  {:<40}  {:<12}  {}",
                profile.pathway.to_string(),
                profile.speaker_profile_id,
                profile.status,
                profile.name
            );
        }
        Ok(())
    }
}
