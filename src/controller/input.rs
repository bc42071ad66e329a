/// Platform-agnostic input handling system
use std::collections::HashSet;

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    // Keyboard events
    KeyDown(String),
    KeyUp(String),

    // Mouse events
    MouseMove { dx: f32, dy: f32 },

    // Window events
    FocusLost,
    PointerLockChanged { locked: bool },
}

/// Pressed keys plus pointer motion accumulated since the last frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            look_delta: (0.0, 0.0),
            pointer_locked: false,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(key.clone());
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key.as_str());
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                if !locked {
                    self.look_delta = (0.0, 0.0);
                }
            }
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        let result = self.look_delta;
        self.look_delta = (0.0, 0.0);
        result
    }
}

/// Everything a key can do in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    PickUpLamp,
    PickUpCompanion,
    ToggleProjection,
    ToggleDarkness,
    WeakenLight,
    StrengthenLight,
    Reset,
    Quit,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::PickUpLamp,
        Action::PickUpCompanion,
        Action::ToggleProjection,
        Action::ToggleDarkness,
        Action::WeakenLight,
        Action::StrengthenLight,
        Action::Reset,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Forward => "Move forward",
            Action::Backward => "Move back",
            Action::Left => "Strafe left",
            Action::Right => "Strafe right",
            Action::Jump => "Jump",
            Action::PickUpLamp => "Pick up / drop lamp",
            Action::PickUpCompanion => "Pick up / drop Sven",
            Action::ToggleProjection => "Toggle orthographic",
            Action::ToggleDarkness => "Toggle darkness",
            Action::WeakenLight => "Light reaches further",
            Action::StrengthenLight => "Light reaches less",
            Action::Reset => "Reset",
            Action::Quit => "Quit",
        }
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub pick_up_lamp: String,
    pub pick_up_companion: String,
    pub toggle_projection: String,
    pub toggle_darkness: String,
    pub weaken_light: String,
    pub strengthen_light: String,
    pub reset: String,
    pub quit: String,
}

impl KeyBindings {
    pub fn key_for(&self, action: Action) -> &str {
        match action {
            Action::Forward => &self.forward,
            Action::Backward => &self.backward,
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Jump => &self.jump,
            Action::PickUpLamp => &self.pick_up_lamp,
            Action::PickUpCompanion => &self.pick_up_companion,
            Action::ToggleProjection => &self.toggle_projection,
            Action::ToggleDarkness => &self.toggle_darkness,
            Action::WeakenLight => &self.weaken_light,
            Action::StrengthenLight => &self.strengthen_light,
            Action::Reset => &self.reset,
            Action::Quit => &self.quit,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            backward: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            jump: " ".to_string(),
            pick_up_lamp: "f".to_string(),
            pick_up_companion: "e".to_string(),
            toggle_projection: "p".to_string(),
            toggle_darkness: "o".to_string(),
            weaken_light: "l".to_string(),
            strengthen_light: "k".to_string(),
            reset: "r".to_string(),
            quit: "Escape".to_string(),
        }
    }
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Letter keys match in either case.
    pub fn is_active(&self, input: &InputState, action: Action) -> bool {
        let key = self.bindings.key_for(action);
        input.is_key_pressed(key) || input.is_key_pressed(&key.to_ascii_uppercase())
    }

    pub fn is_moving_forward(&self, input: &InputState) -> bool {
        self.is_active(input, Action::Forward) || input.is_key_pressed("ArrowUp")
    }

    pub fn is_moving_backward(&self, input: &InputState) -> bool {
        self.is_active(input, Action::Backward) || input.is_key_pressed("ArrowDown")
    }

    pub fn is_moving_left(&self, input: &InputState) -> bool {
        self.is_active(input, Action::Left) || input.is_key_pressed("ArrowLeft")
    }

    pub fn is_moving_right(&self, input: &InputState) -> bool {
        self.is_active(input, Action::Right) || input.is_key_pressed("ArrowRight")
    }

    pub fn is_jumping(&self, input: &InputState) -> bool {
        self.is_active(input, Action::Jump)
    }

    pub fn is_quit(&self, input: &InputState) -> bool {
        self.is_active(input, Action::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(keys: &[&str]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.process_event(&InputEvent::KeyDown(key.to_string()));
        }
        input
    }

    #[test]
    fn key_up_releases() {
        let mut input = pressed(&["w"]);
        assert!(input.is_key_pressed("w"));
        input.process_event(&InputEvent::KeyUp("w".into()));
        assert!(!input.is_key_pressed("w"));
    }

    #[test]
    fn focus_loss_clears_everything() {
        let mut input = pressed(&["w", "a", " "]);
        input.process_event(&InputEvent::FocusLost);
        assert!(input.pressed_keys.is_empty());
    }

    #[test]
    fn look_only_accumulates_while_locked() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::MouseMove { dx: 5.0, dy: 1.0 });
        assert_eq!(input.consume_look(), (0.0, 0.0));

        input.process_event(&InputEvent::PointerLockChanged { locked: true });
        input.process_event(&InputEvent::MouseMove { dx: 5.0, dy: 1.0 });
        input.process_event(&InputEvent::MouseMove { dx: -2.0, dy: 3.0 });
        assert_eq!(input.consume_look(), (3.0, 4.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn actions_match_either_case() {
        let processor = InputProcessor::default();
        assert!(processor.is_active(&pressed(&["F"]), Action::PickUpLamp));
        assert!(processor.is_active(&pressed(&["f"]), Action::PickUpLamp));
        assert!(!processor.is_active(&pressed(&["e"]), Action::PickUpLamp));
        assert!(processor.is_quit(&pressed(&["Escape"])));
        assert!(processor.is_moving_forward(&pressed(&["ArrowUp"])));
    }

    #[test]
    fn every_action_has_a_distinct_default_key() {
        let bindings = KeyBindings::default();
        let keys: HashSet<&str> = Action::ALL.iter().map(|a| bindings.key_for(*a)).collect();
        assert_eq!(keys.len(), Action::ALL.len());
    }

    #[test]
    fn custom_bindings_are_honoured() {
        let bindings = KeyBindings { jump: "j".into(), ..KeyBindings::default() };
        let processor = InputProcessor::new(bindings);
        assert!(processor.is_jumping(&pressed(&["j"])));
        assert!(!processor.is_jumping(&pressed(&[" "])));
    }
}
