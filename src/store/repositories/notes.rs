use crate::{models::Challenge, store::Store};

impl Store {
    /// Appends a free-text note to the challenge, whatever its status.
    pub async fn add_overall_note(&self, challenge_id: &str, note: &str) -> Option<Challenge> {
        self.mutate_challenge(challenge_id, |challenge, _| {
            challenge.overall_notes.push(note.to_string());
            true
        })
        .await
    }

    /// Replaces the note at `index`; `None` if the index is out of range.
    pub async fn edit_overall_note(
        &self,
        challenge_id: &str,
        index: usize,
        text: &str,
    ) -> Option<Challenge> {
        self.mutate_challenge(challenge_id, |challenge, _| {
            match challenge.overall_notes.get_mut(index) {
                Some(existing) => {
                    *existing = text.to_string();
                    true
                }
                None => false,
            }
        })
        .await
    }

    pub async fn delete_overall_note(&self, challenge_id: &str, index: usize) -> Option<Challenge> {
        self.mutate_challenge(challenge_id, |challenge, _| {
            if index < challenge.overall_notes.len() {
                challenge.overall_notes.remove(index);
                true
            } else {
                false
            }
        })
        .await
    }
}
