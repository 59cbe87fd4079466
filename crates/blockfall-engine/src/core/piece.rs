use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Width and height of the square template every rotation state is drawn in.
pub const TEMPLATE_SIZE: u8 = 5;

/// Number of occupied cells in every rotation state of every shape.
pub const CELLS_PER_PIECE: usize = 4;

/// Board row the top of a freshly spawned piece's template starts at.
///
/// Spawning above the board lets the upper part of a piece hang over the
/// visible area until it falls into it.
pub const SPAWN_Y: i32 = -2;

/// A tetromino (piece) on or above the board.
///
/// A piece is a shape in one of its rotation states, placed by the top-left
/// corner of its 5×5 template, and painted in one color. The rotation index is
/// always in range for the shape; construction rejects anything else.
///
/// Pieces are plain values: moving and rotating return new pieces, and the
/// caller decides whether to keep them.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceColor, PiecePosition, RotationDirection, Shape};
///
/// let color = PieceColor::new(0).unwrap();
/// let piece = Piece::new(Shape::T, 0, PiecePosition::new(3, 0), color).unwrap();
///
/// let moved = piece.shifted(1, 0);
/// assert_eq!(moved.position().x(), 4);
///
/// let rotated = moved.rotated(RotationDirection::CounterClockwise);
/// assert_eq!(rotated.rotation(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    shape: Shape,
    rotation: usize,
    position: PiecePosition,
    color: PieceColor,
}

impl Piece {
    pub fn new(
        shape: Shape,
        rotation: usize,
        position: PiecePosition,
        color: PieceColor,
    ) -> Result<Self, InvalidRotationError> {
        if rotation >= shape.rotation_count() {
            return Err(InvalidRotationError { shape, rotation });
        }
        Ok(Self {
            shape,
            rotation,
            position,
            color,
        })
    }

    /// Creates a piece at the spawn position for a board of the given width.
    ///
    /// The template is centered horizontally and starts at [`SPAWN_Y`].
    pub fn spawn(
        shape: Shape,
        rotation: usize,
        color: PieceColor,
        board_width: u16,
    ) -> Result<Self, InvalidRotationError> {
        Self::new(shape, rotation, PiecePosition::spawn(board_width), color)
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub fn mask(&self) -> PieceMask {
        self.shape.masks()[self.rotation]
    }

    /// Returns the board coordinates of the occupied cells.
    ///
    /// Rows may be negative while the piece hangs above the board.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let PiecePosition { x, y } = self.position;
        self.mask()
            .occupied_cells()
            .into_iter()
            .map(move |(dx, dy)| {
                (
                    x.saturating_add(i32::from(dx)),
                    y.saturating_add(i32::from(dy)),
                )
            })
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }

    /// Returns this piece turned one rotation state in the given direction.
    ///
    /// The index wraps around the shape's rotation count, so turning a
    /// one-state shape (O) is the identity.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let count = self.shape.rotation_count();
        let rotation = match direction {
            RotationDirection::Clockwise => (self.rotation + 1) % count,
            RotationDirection::CounterClockwise => (self.rotation + count - 1) % count,
        };
        Self { rotation, ..*self }
    }
}

impl fmt::Display for Piece {
    // Format: "shape#rotation@x,y:color" (e.g. "S#1@3,-2:0")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}:{}",
            self.shape, self.rotation, self.position.x, self.position.y, self.color.0
        )
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || ParsePieceError::Format(s.to_owned());

        let (shape, rest) = s.split_once('#').ok_or_else(format_error)?;
        let (rotation, rest) = rest.split_once('@').ok_or_else(format_error)?;
        let (position, color) = rest.split_once(':').ok_or_else(format_error)?;
        let (x, y) = position.split_once(',').ok_or_else(format_error)?;

        let shape = shape.parse::<Shape>()?;
        let rotation = parse_number::<usize>(rotation)?;
        let x = parse_number::<i32>(x)?;
        let y = parse_number::<i32>(y)?;
        let color = parse_number::<u8>(color)?;
        let color = PieceColor::new(color).ok_or(ParsePieceError::Color(color))?;

        Ok(Self::new(shape, rotation, PiecePosition::new(x, y), color)?)
    }
}

fn parse_number<T: FromStr>(s: &str) -> Result<T, ParsePieceError> {
    s.parse()
        .map_err(|_| ParsePieceError::Number(s.to_owned()))
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "rotation {rotation} is out of range for {shape}-piece ({} states)",
    shape.rotation_count()
)]
pub struct InvalidRotationError {
    shape: Shape,
    rotation: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceError {
    #[display("expected format 'shape#rotation@x,y:color', got '{_0}'")]
    Format(#[error(not(source))] String),
    #[display("invalid piece shape: '{_0}'")]
    Shape(#[error(not(source))] String),
    #[display("invalid number: '{_0}'")]
    Number(#[error(not(source))] String),
    #[display("piece color must be below {}, got {_0}", PieceColor::COUNT)]
    Color(#[error(not(source))] u8),
    #[display("{_0}")]
    Rotation(InvalidRotationError),
}

impl From<InvalidRotationError> for ParsePieceError {
    fn from(err: InvalidRotationError) -> Self {
        Self::Rotation(err)
    }
}

/// Position of a piece's template on the board.
///
/// (0, 0) is the top-left cell of the board; x grows rightward, y downward.
/// Both coordinates may leave the board: the template has empty margins, and
/// pieces spawn above row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Spawn position on a board of the given width.
    #[must_use]
    pub fn spawn(board_width: u16) -> Self {
        let x = i32::from(board_width) / 2 - i32::from(TEMPLATE_SIZE) / 2;
        Self::new(x, SPAWN_Y)
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Color index of a piece, shared by the board cells it turns into.
///
/// Colors are independent of the shape. Renderers map the index to an actual
/// palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceColor(u8);

impl PieceColor {
    /// Number of distinct piece colors.
    pub const COUNT: u8 = 4;

    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl Distribution<PieceColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceColor {
        PieceColor(rng.random_range(0..PieceColor::COUNT))
    }
}

/// The seven tetromino shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Shape {
    S,
    Z,
    J,
    L,
    I,
    O,
    T,
}

impl Distribution<Shape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        Shape::ALL[rng.random_range(0..Shape::LEN)]
    }
}

impl Shape {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Shape; Self::LEN] = [
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
        Shape::I,
        Shape::O,
        Shape::T,
    ];

    /// Returns every rotation state of this shape, in clockwise order.
    #[must_use]
    pub const fn masks(self) -> &'static [PieceMask] {
        match self {
            Shape::S => &S_MASKS,
            Shape::Z => &Z_MASKS,
            Shape::J => &J_MASKS,
            Shape::L => &L_MASKS,
            Shape::I => &I_MASKS,
            Shape::O => &O_MASKS,
            Shape::T => &T_MASKS,
        }
    }

    /// Number of distinct rotation states (4 for S/Z/J/L/T, 2 for I, 1 for O).
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        self.masks().len()
    }

    /// Returns the mask of the given rotation state.
    ///
    /// Indices are not wrapped: anything at or above [`Self::rotation_count`]
    /// yields `None`.
    #[must_use]
    pub fn mask(self, rotation: usize) -> Option<PieceMask> {
        self.masks().get(rotation).copied()
    }

    /// Returns the single character representation of this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::Shape;
    ///
    /// assert_eq!(Shape::I.as_char(), 'I');
    /// assert_eq!(Shape::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Shape::S => 'S',
            Shape::Z => 'Z',
            Shape::J => 'J',
            Shape::L => 'L',
            Shape::I => 'I',
            Shape::O => 'O',
            Shape::T => 'T',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Shape::S),
            'Z' => Some(Shape::Z),
            'J' => Some(Shape::J),
            'L' => Some(Shape::L),
            'I' => Some(Shape::I),
            'O' => Some(Shape::O),
            'T' => Some(Shape::T),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Shape {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let shape = match (chars.next(), chars.next()) {
            (Some(c), None) => Shape::from_char(c),
            _ => None,
        };
        shape.ok_or_else(|| ParsePieceError::Shape(s.to_owned()))
    }
}

/// Occupancy of one rotation state within the 5×5 template.
///
/// Each row is stored as a 5-bit mask; bit `x` of row `y` is set when the
/// template cell (x, y) is part of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMask([u8; TEMPLATE_SIZE as usize]);

impl PieceMask {
    /// Builds a mask from a template drawn with `O` (occupied) and `.` (empty).
    const fn from_template(rows: [&[u8; TEMPLATE_SIZE as usize]; TEMPLATE_SIZE as usize]) -> Self {
        let mut bits = [0; TEMPLATE_SIZE as usize];
        let mut y = 0;
        while y < rows.len() {
            let mut x = 0;
            while x < rows[y].len() {
                if rows[y][x] == b'O' {
                    bits[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self(bits)
    }

    /// Number of occupied cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        let mut count = 0;
        let mut y = 0;
        while y < self.0.len() {
            count += self.0[y].count_ones() as usize;
            y += 1;
        }
        count
    }

    /// Returns whether the template cell (x, y) is occupied.
    ///
    /// Cells outside the template are never occupied.
    #[must_use]
    pub fn is_occupied(self, x: u8, y: u8) -> bool {
        x < TEMPLATE_SIZE
            && self
                .0
                .get(usize::from(y))
                .is_some_and(|row| row & (1 << x) != 0)
    }

    /// Returns the template coordinates of the occupied cells, row by row.
    #[must_use]
    pub fn occupied_cells(self) -> ArrayVec<(u8, u8), CELLS_PER_PIECE> {
        let mut cells = ArrayVec::new();
        for y in 0..TEMPLATE_SIZE {
            for x in 0..TEMPLATE_SIZE {
                if self.is_occupied(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }
}

const fn m(rows: [&[u8; TEMPLATE_SIZE as usize]; TEMPLATE_SIZE as usize]) -> PieceMask {
    PieceMask::from_template(rows)
}

const S_MASKS: [PieceMask; 4] = [
    m([b".....", b".....", b"..OO.", b".OO..", b"....."]),
    m([b".....", b"..O..", b"..OO.", b"...O.", b"....."]),
    m([b".....", b"..OO.", b".OO..", b".....", b"....."]),
    m([b".....", b".O...", b".OO..", b"..O..", b"....."]),
];

const Z_MASKS: [PieceMask; 4] = [
    m([b".....", b".....", b".OO..", b"..OO.", b"....."]),
    m([b".....", b"..O..", b".OO..", b".O...", b"....."]),
    m([b".....", b".OO..", b"..OO.", b".....", b"....."]),
    m([b".....", b"...O.", b"..OO.", b"..O..", b"....."]),
];

const J_MASKS: [PieceMask; 4] = [
    m([b".....", b".O...", b".OOO.", b".....", b"....."]),
    m([b".....", b"..OO.", b"..O..", b"..O..", b"....."]),
    m([b".....", b".....", b".OOO.", b"...O.", b"....."]),
    m([b".....", b"..O..", b"..O..", b".OO..", b"....."]),
];

const L_MASKS: [PieceMask; 4] = [
    m([b".....", b"...O.", b".OOO.", b".....", b"....."]),
    m([b".....", b"..O..", b"..O..", b"..OO.", b"....."]),
    m([b".....", b".....", b".OOO.", b".O...", b"....."]),
    m([b".....", b".OO..", b"..O..", b"..O..", b"....."]),
];

const I_MASKS: [PieceMask; 2] = [
    m([b"..O..", b"..O..", b"..O..", b"..O..", b"....."]),
    m([b".....", b".....", b"OOOO.", b".....", b"....."]),
];

const O_MASKS: [PieceMask; 1] = [m([b".....", b".....", b".OO..", b".OO..", b"....."])];

const T_MASKS: [PieceMask; 4] = [
    m([b".....", b"..O..", b".OOO.", b".....", b"....."]),
    m([b".....", b"..O..", b"..OO.", b"..O..", b"....."]),
    m([b".....", b".....", b".OOO.", b"..O..", b"....."]),
    m([b".....", b"..O..", b".OO..", b"..O..", b"....."]),
];

// A malformed template fails the build instead of surfacing at runtime.
const _: () = {
    let mut i = 0;
    while i < Shape::ALL.len() {
        let masks = Shape::ALL[i].masks();
        assert!(!masks.is_empty());
        let mut r = 0;
        while r < masks.len() {
            assert!(
                masks[r].cell_count() == CELLS_PER_PIECE,
                "every rotation state must occupy exactly 4 cells"
            );
            r += 1;
        }
        i += 1;
    }
};
