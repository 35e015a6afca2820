pub mod mapping;
pub mod recording;

use crate::agent_config::AgentConfig;
use crate::error::Result;

use mapping::AvatarMapper;
use recording::SampleRecorder;

pub struct Systems {
    pub mapper: AvatarMapper,
    pub recorder: SampleRecorder,
}

impl Systems {
    pub fn new(config: &AgentConfig) -> Result<Systems> {
        Ok(Systems {
            mapper: AvatarMapper::new(config)?,
            recorder: SampleRecorder::new(),
        })
    }
}
