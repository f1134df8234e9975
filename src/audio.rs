use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Title,
    Stairs,
}

/// Sound hook. There is no output backend yet; cues are only logged.
#[derive(Debug, Default)]
pub struct AudioManager {
    #[cfg(test)]
    played: Vec<Cue>,
}

impl AudioManager {
    pub fn new() -> Self {
        debug!("audio manager up without an output backend");
        Self::default()
    }

    pub fn cue(&mut self, cue: Cue) {
        debug!("audio cue {cue:?}");
        #[cfg(test)]
        self.played.push(cue);
    }

    #[cfg(test)]
    pub fn played(&self) -> &[Cue] {
        &self.played
    }
}
