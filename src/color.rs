/// Color representation for instrument elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const FLORAL_WHITE: Color = Color::new(0xff, 0xfa, 0xf0);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::new(0x00, 0x80, 0x00);
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xff);
    pub const DARK_BLUE: Color = Color::new(0x00, 0x00, 0x8b);
    pub const BROWN: Color = Color::new(0xa5, 0x2a, 0x2a);
    pub const YELLOW: Color = Color::new(0xff, 0xff, 0x00);
    pub const ORANGE: Color = Color::new(0xff, 0xa5, 0x00);
    pub const DARK_ORANGE: Color = Color::new(0xff, 0x8c, 0x00);
    pub const CYAN: Color = Color::new(0x00, 0xff, 0xff);
    pub const MAGENTA: Color = Color::new(0xff, 0x00, 0xff);
    pub const DIM_GRAY: Color = Color::new(0x69, 0x69, 0x69);
    pub const LAVENDER: Color = Color::new(0xe6, 0xe6, 0xfa);
    pub const ORANGE_RED: Color = Color::new(0xff, 0x45, 0x00);
    pub const POWDER_BLUE: Color = Color::new(0xb0, 0xe0, 0xe6);
}
