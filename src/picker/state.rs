use crate::models::SelectOption;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Pending,
    Chosen(SelectOption),
    Canceled,
}

/// Stable partition putting pinned options first.
pub fn arrange(options: Vec<SelectOption>) -> Vec<SelectOption> {
    let (mut pinned, rest): (Vec<_>, Vec<_>) = options.into_iter().partition(|o| o.is_pinned);
    pinned.extend(rest);
    pinned
}

/// Insert the synthetic default-list option at the head of the list. With
/// `pinned` set it joins the pinned group, otherwise it leads the unpinned one.
pub fn with_default_list(mut options: Vec<SelectOption>, pinned: bool) -> Vec<SelectOption> {
    options.insert(0, SelectOption::default_list(pinned));
    options
}

/// Filtering, highlighting and the one-shot resolution of a single picker round.
#[derive(Debug, Clone)]
pub struct PickerState {
    pub title: String,
    options: Vec<SelectOption>,
    query: String,
    visible: Vec<usize>,
    selected: usize,
    resolution: Resolution,
}

impl PickerState {
    pub fn new(title: impl Into<String>, options: Vec<SelectOption>) -> Self {
        let options = arrange(options);
        let visible = (0..options.len()).collect();
        PickerState {
            title: title.into(),
            options,
            query: String::new(),
            visible,
            selected: 0,
            resolution: Resolution::Pending,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible(&self) -> impl Iterator<Item = &SelectOption> {
        self.visible.iter().map(move |&i| &self.options[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn selected(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution != Resolution::Pending
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_resolved() {
            return;
        }
        self.query.push(c);
        self.refilter();
    }

    pub fn backspace(&mut self) {
        if self.is_resolved() {
            return;
        }
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.visible.len();
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.visible.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// Resolve to the highlighted option. Returns false when the round was
    /// already resolved or nothing is visible.
    pub fn commit(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        let Some(&index) = self.visible.get(self.selected) else {
            return false;
        };
        self.resolution = Resolution::Chosen(self.options[index].clone());
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.resolution = Resolution::Canceled;
        true
    }

    pub fn into_choice(self) -> Option<SelectOption> {
        match self.resolution {
            Resolution::Chosen(option) => Some(option),
            Resolution::Pending | Resolution::Canceled => None,
        }
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
    }
}
