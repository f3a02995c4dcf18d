//! Audio cues over `HtmlAudioElement`.
//!
//! Everything here is best-effort: an asset that fails to load leaves its
//! slot `None` and the cue degrades to silence. Play promises rejected by the
//! browser (autoplay policy, decode failure) are dropped for the same reason.

use web_sys::HtmlAudioElement;

use crate::game::Feedback;

const MUSIC_SRC: &str = "assets/audio/bgmusic.wav";
const FLIP_SRC: &str = "assets/audio/cardflip.wav";
const MATCH_SRC: &str = "assets/audio/match.wav";
const VICTORY_SRC: &str = "assets/audio/victory.wav";
const GAME_OVER_SRC: &str = "assets/audio/gameover.wav";

/// Background track plus the four one-shot cues.
pub struct AudioFeedback {
    music: Option<HtmlAudioElement>,
    flip_cue: Option<HtmlAudioElement>,
    match_cue: Option<HtmlAudioElement>,
    victory_cue: Option<HtmlAudioElement>,
    game_over_cue: Option<HtmlAudioElement>,
}

impl AudioFeedback {
    pub fn new(music_volume: f64) -> Self {
        let music = load_cue(MUSIC_SRC);
        if let Some(music) = &music {
            music.set_volume(music_volume);
            music.set_loop(true);
        }
        Self {
            music,
            flip_cue: load_cue(FLIP_SRC),
            match_cue: load_cue(MATCH_SRC),
            victory_cue: load_cue(VICTORY_SRC),
            game_over_cue: load_cue(GAME_OVER_SRC),
        }
    }
}

fn load_cue(src: &str) -> Option<HtmlAudioElement> {
    HtmlAudioElement::new_with_src(src).ok()
}

/// Rewind then play, so rapid re-triggers restart the cue instead of being
/// swallowed by an element that is still playing.
fn play_from_start(cue: Option<&HtmlAudioElement>) {
    if let Some(cue) = cue {
        cue.set_current_time(0.0);
        let _ = cue.play();
    }
}

impl Feedback for AudioFeedback {
    fn start_music(&mut self) {
        if let Some(music) = &self.music {
            if music.paused() {
                let _ = music.play();
            }
        }
    }

    fn stop_music(&mut self) {
        if let Some(music) = &self.music {
            let _ = music.pause();
            music.set_current_time(0.0);
        }
    }

    fn cue_flip(&mut self) {
        play_from_start(self.flip_cue.as_ref());
    }

    fn cue_match(&mut self) {
        play_from_start(self.match_cue.as_ref());
    }

    fn cue_victory(&mut self) {
        self.stop_music();
        play_from_start(self.victory_cue.as_ref());
    }

    fn cue_game_over(&mut self) {
        self.stop_music();
        play_from_start(self.game_over_cue.as_ref());
    }
}
