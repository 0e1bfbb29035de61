use resume::Section;

/// Tracks which section is being edited. Starts at basic info, advances in
/// the fixed section order and stays on leadership once reached. The sidebar
/// may jump anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionNavigator {
    current: Section,
}

impl Default for SectionNavigator {
    fn default() -> Self {
        Self {
            current: Section::BasicInfo,
        }
    }
}

impl SectionNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn advance(&mut self) -> Section {
        self.current = self.current.next();
        self.current
    }

    pub fn jump(&mut self, target: Section) -> Section {
        self.current = target;
        self.current
    }

    pub fn reset(&mut self) {
        self.current = Section::BasicInfo;
    }
}
