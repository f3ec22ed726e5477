use crate::mpris::MprisHandle;
use crate::player::{Launcher, PlaybackState, Player};

/// What was last pushed to MPRIS, so unchanged state is not re-published.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Published {
    pub track_id: Option<String>,
    pub state: PlaybackState,
}

pub fn snapshot<L: Launcher>(player: &Player<L>) -> Published {
    Published {
        track_id: player.current_track().map(|t| t.id.clone()),
        state: player.state(),
    }
}

pub fn update_mpris<L: Launcher>(
    mpris: &MprisHandle,
    player: &Player<L>,
    last: &mut Option<Published>,
) {
    let now = snapshot(player);
    if last.as_ref() == Some(&now) {
        return;
    }

    if last.as_ref().map(|p| &p.track_id) != Some(&now.track_id) {
        mpris.set_track_metadata(player.current_track());
    }
    mpris.set_playback(now.state);
    *last = Some(now);
}
