use super::Plater;

impl Plater {
    /// Undoes the last operation. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.store);
        if undone {
            self.after_mutation();
        }
        undone
    }

    /// Redoes the last undone operation. Returns false when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.store);
        if redone {
            self.after_mutation();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
