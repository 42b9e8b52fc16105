use std::fmt;

macro_rules! keys {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// Keyboard key identifier.
        ///
        /// Every key carries a stable numeric code (the values scripts see
        /// as `keyboard.<NAME>`) and an upper-case name without prefix.
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub enum Key {
            $($variant,)*
        }

        impl Key {
            /// All keys, in code order.
            pub const ALL: &'static [Key] = &[$(Key::$variant,)*];

            #[inline]
            pub const fn code(self) -> i32 {
                match self {
                    $(Key::$variant => $code,)*
                }
            }

            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => $name,)*
                }
            }

            pub fn from_code(code: i32) -> Option<Key> {
                match code {
                    $($code => Some(Key::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

keys! {
    Space = 32 => "SPACE",
    Apostrophe = 39 => "APOSTROPHE",
    Comma = 44 => "COMMA",
    Minus = 45 => "MINUS",
    Period = 46 => "PERIOD",
    Slash = 47 => "SLASH",
    Digit0 = 48 => "ZERO",
    Digit1 = 49 => "ONE",
    Digit2 = 50 => "TWO",
    Digit3 = 51 => "THREE",
    Digit4 = 52 => "FOUR",
    Digit5 = 53 => "FIVE",
    Digit6 = 54 => "SIX",
    Digit7 = 55 => "SEVEN",
    Digit8 = 56 => "EIGHT",
    Digit9 = 57 => "NINE",
    Semicolon = 59 => "SEMICOLON",
    Equal = 61 => "EQUAL",
    A = 65 => "A",
    B = 66 => "B",
    C = 67 => "C",
    D = 68 => "D",
    E = 69 => "E",
    F = 70 => "F",
    G = 71 => "G",
    H = 72 => "H",
    I = 73 => "I",
    J = 74 => "J",
    K = 75 => "K",
    L = 76 => "L",
    M = 77 => "M",
    N = 78 => "N",
    O = 79 => "O",
    P = 80 => "P",
    Q = 81 => "Q",
    R = 82 => "R",
    S = 83 => "S",
    T = 84 => "T",
    U = 85 => "U",
    V = 86 => "V",
    W = 87 => "W",
    X = 88 => "X",
    Y = 89 => "Y",
    Z = 90 => "Z",
    LeftBracket = 91 => "LEFT_BRACKET",
    Backslash = 92 => "BACKSLASH",
    RightBracket = 93 => "RIGHT_BRACKET",
    Grave = 96 => "GRAVE",
    Escape = 256 => "ESCAPE",
    Enter = 257 => "ENTER",
    Tab = 258 => "TAB",
    Backspace = 259 => "BACKSPACE",
    Insert = 260 => "INSERT",
    Delete = 261 => "DELETE",
    ArrowRight = 262 => "RIGHT",
    ArrowLeft = 263 => "LEFT",
    ArrowDown = 264 => "DOWN",
    ArrowUp = 265 => "UP",
    PageUp = 266 => "PAGE_UP",
    PageDown = 267 => "PAGE_DOWN",
    Home = 268 => "HOME",
    End = 269 => "END",
    CapsLock = 280 => "CAPS_LOCK",
    ScrollLock = 281 => "SCROLL_LOCK",
    NumLock = 282 => "NUM_LOCK",
    PrintScreen = 283 => "PRINT_SCREEN",
    Pause = 284 => "PAUSE",
    F1 = 290 => "F1",
    F2 = 291 => "F2",
    F3 = 292 => "F3",
    F4 = 293 => "F4",
    F5 = 294 => "F5",
    F6 = 295 => "F6",
    F7 = 296 => "F7",
    F8 = 297 => "F8",
    F9 = 298 => "F9",
    F10 = 299 => "F10",
    F11 = 300 => "F11",
    F12 = 301 => "F12",
    Kp0 = 320 => "KP_0",
    Kp1 = 321 => "KP_1",
    Kp2 = 322 => "KP_2",
    Kp3 = 323 => "KP_3",
    Kp4 = 324 => "KP_4",
    Kp5 = 325 => "KP_5",
    Kp6 = 326 => "KP_6",
    Kp7 = 327 => "KP_7",
    Kp8 = 328 => "KP_8",
    Kp9 = 329 => "KP_9",
    KpDecimal = 330 => "KP_DECIMAL",
    KpDivide = 331 => "KP_DIVIDE",
    KpMultiply = 332 => "KP_MULTIPLY",
    KpSubtract = 333 => "KP_SUBTRACT",
    KpAdd = 334 => "KP_ADD",
    KpEnter = 335 => "KP_ENTER",
    KpEqual = 336 => "KP_EQUAL",
    LeftShift = 340 => "LEFT_SHIFT",
    LeftControl = 341 => "LEFT_CONTROL",
    LeftAlt = 342 => "LEFT_ALT",
    LeftSuper = 343 => "LEFT_SUPER",
    RightShift = 344 => "RIGHT_SHIFT",
    RightControl = 345 => "RIGHT_CONTROL",
    RightAlt = 346 => "RIGHT_ALT",
    RightSuper = 347 => "RIGHT_SUPER",
    Menu = 348 => "MENU",
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the window runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when the event is an OS key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}
