use super::Effect;

pub const HAMBURGER: &str = ".hamburger";
pub const NAV_MENU: &str = ".nav-menu";
pub const NAV_LINK: &str = ".nav-link";
pub const ACTIVE: &str = "active";

/// Mobile menu; the hamburger and the menu always share one state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavToggle {
    open: bool,
}

impl NavToggle {
    pub fn is_open(&self) -> bool { self.open }

    pub fn toggle(&mut self) -> Vec<Effect> {
        self.open = !self.open;
        self.effects()
    }

    pub fn close(&mut self) -> Vec<Effect> {
        self.open = false;
        self.effects()
    }

    fn effects(&self) -> Vec<Effect> {
        vec![Effect::class(HAMBURGER, ACTIVE, self.open), Effect::class(NAV_MENU, ACTIVE, self.open)]
    }
}
