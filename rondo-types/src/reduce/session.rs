use crate::action::SessionAction;
use crate::state::session::{SessionState, MAX_BPM, MAX_MEASURES, MIN_BPM, MIN_MEASURES};

pub fn reduce_session(action: &SessionAction, session: &mut SessionState) {
    match action {
        SessionAction::SetBpm(bpm) => {
            session.bpm = (*bpm).clamp(MIN_BPM, MAX_BPM);
        }
        SessionAction::AdjustBpm(delta) => {
            let bpm = session.bpm as i32 + *delta as i32;
            session.bpm = bpm.clamp(MIN_BPM as i32, MAX_BPM as i32) as u16;
        }
        SessionAction::SetMeasures(n) => {
            session.measures_to_change = (*n).clamp(MIN_MEASURES, MAX_MEASURES);
        }
        SessionAction::AdjustMeasures(delta) => {
            let n = session.measures_to_change as i16 + *delta as i16;
            session.measures_to_change = n.clamp(MIN_MEASURES as i16, MAX_MEASURES as i16) as u8;
        }
        SessionAction::SetCategory(cat) => {
            session.category = *cat;
        }
        SessionAction::CycleCategory => {
            session.category = session.category.next();
        }
        SessionAction::TogglePrepBar => {
            session.prep_bar = !session.prep_bar;
        }
        SessionAction::AdjustClickVolume(delta) => {
            session.click_volume = (session.click_volume + delta).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::music::KeyCategory;

    #[test]
    fn set_bpm_clamps_to_bounds() {
        let mut s = SessionState::default();
        reduce_session(&SessionAction::SetBpm(10), &mut s);
        assert_eq!(s.bpm, MIN_BPM);
        reduce_session(&SessionAction::SetBpm(999), &mut s);
        assert_eq!(s.bpm, MAX_BPM);
        reduce_session(&SessionAction::SetBpm(90), &mut s);
        assert_eq!(s.bpm, 90);
    }

    #[test]
    fn adjust_bpm_saturates() {
        let mut s = SessionState::default();
        s.bpm = MIN_BPM;
        reduce_session(&SessionAction::AdjustBpm(-1), &mut s);
        assert_eq!(s.bpm, MIN_BPM);
        s.bpm = MAX_BPM;
        reduce_session(&SessionAction::AdjustBpm(10), &mut s);
        assert_eq!(s.bpm, MAX_BPM);
    }

    #[test]
    fn measures_clamp() {
        let mut s = SessionState::default();
        reduce_session(&SessionAction::SetMeasures(0), &mut s);
        assert_eq!(s.measures_to_change, MIN_MEASURES);
        reduce_session(&SessionAction::SetMeasures(100), &mut s);
        assert_eq!(s.measures_to_change, MAX_MEASURES);
        reduce_session(&SessionAction::AdjustMeasures(-100), &mut s);
        assert_eq!(s.measures_to_change, MIN_MEASURES);
    }

    #[test]
    fn cycle_category() {
        let mut s = SessionState::default();
        reduce_session(&SessionAction::CycleCategory, &mut s);
        assert_eq!(s.category, KeyCategory::Majors);
        reduce_session(&SessionAction::CycleCategory, &mut s);
        assert_eq!(s.category, KeyCategory::Minors);
        reduce_session(&SessionAction::CycleCategory, &mut s);
        assert_eq!(s.category, KeyCategory::All);
    }

    #[test]
    fn toggle_prep_bar() {
        let mut s = SessionState::default();
        assert!(s.prep_bar);
        reduce_session(&SessionAction::TogglePrepBar, &mut s);
        assert!(!s.prep_bar);
    }

    #[test]
    fn click_volume_clamps() {
        let mut s = SessionState::default();
        reduce_session(&SessionAction::AdjustClickVolume(1.0), &mut s);
        assert_eq!(s.click_volume, 1.0);
        reduce_session(&SessionAction::AdjustClickVolume(-2.0), &mut s);
        assert_eq!(s.click_volume, 0.0);
    }
}
