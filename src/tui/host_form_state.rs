use crate::models::{HostInput, Protocol};

/// "New host" form: protocol, hostname, default flag, then the add button.
pub struct HostFormState {
    pub protocol: Protocol,
    pub hostname: String,
    pub default: bool,
    pub selected_field: usize,
}

impl Default for HostFormState {
    fn default() -> Self {
        HostFormState { protocol: Protocol::Https, hostname: String::new(), default: false, selected_field: 1 }
    }
}

impl HostFormState {
    pub const PROTOCOL: usize = 0;
    pub const HOSTNAME: usize = 1;
    pub const DEFAULT: usize = 2;
    pub const SUBMIT: usize = 3;

    pub fn fields_count() -> usize {
        3
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % (Self::fields_count() + 1);
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = Self::fields_count();
        } else {
            self.selected_field -= 1;
        }
    }

    /// Flips the protocol or default flag when one of them is focused.
    pub fn toggle(&mut self) {
        match self.selected_field {
            Self::PROTOCOL => self.protocol = self.protocol.toggled(),
            Self::DEFAULT => self.default = !self.default,
            _ => {}
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.selected_field {
            Self::HOSTNAME => self.hostname.push(c),
            Self::PROTOCOL | Self::DEFAULT if c == ' ' => self.toggle(),
            _ => {}
        }
    }

    pub fn pop_char(&mut self) {
        if self.selected_field == Self::HOSTNAME {
            self.hostname.pop();
        }
    }

    pub fn to_input(&self) -> HostInput {
        HostInput {
            protocol: Some(self.protocol.to_string()),
            hostname: Some(self.hostname.trim().to_string()),
            default: self.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_hostname_and_space_toggles() {
        let mut form = HostFormState::default();
        for c in "a.example".chars() {
            form.push_char(c);
        }
        form.pop_char();
        form.push_char('e');
        form.prev_field();
        form.push_char(' ');
        form.next_field();
        form.next_field();
        form.toggle();
        assert_eq!(
            form.to_input(),
            HostInput { protocol: Some("http".into()), hostname: Some("a.example".into()), default: true }
        );
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = HostFormState { selected_field: HostFormState::SUBMIT, ..Default::default() };
        form.next_field();
        assert_eq!(form.selected_field, HostFormState::PROTOCOL);
        form.prev_field();
        assert_eq!(form.selected_field, HostFormState::SUBMIT);
    }
}
