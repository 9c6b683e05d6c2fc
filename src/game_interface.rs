//! Types describing the Cycles game as seen by an agent.
//!
//! A [`GameState`] is the immutable snapshot the server sends at the start of every tick. The
//! agent answers with a single [`Direction`].
//!
//! Both travel as plain text (see [`GameState`]'s `FromStr`/`Display` implementations):
//!  * Server -> Agent : a snapshot block terminated by an `end` line
//!  * Agent -> Server : the direction name (`north`, `east`, `south` or `west`)

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, ensure, Context};

/// Cardinal moves available to a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
}

impl Direction {
    /// All directions, in [`Direction::from_value`] order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Maps an integer in `[0, 4)` to a direction, clockwise starting from north.
    ///
    /// This order is stable across ticks and defines the fallback scan order of the decision
    /// engine.
    pub fn from_value(value: usize) -> Option<Direction> {
        Self::ALL.get(value).copied()
    }

    /// Unit displacement `(dx, dy)`, origin top-left.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Next direction when turning right.
    pub fn clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Direction::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unknown direction '{s}'"))
    }
}

/// A cell coordinate. Signed so that a step off the grid is still representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Column, growing east.
    pub x: i32,
    /// Row, growing south.
    pub y: i32,
}

impl Position {
    /// Creates a position.
    pub const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// The neighbouring cell in `direction`.
    ///
    /// Coordinates saturate at the `i32` limits, which lie outside every grid.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.unit();
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One entry of the snapshot's player list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Identifier written into the grid cells this player's trail occupies. Never 0.
    pub id: u32,
    /// Name the player registered with.
    pub name: String,
    /// Current head position.
    pub position: Position,
}

impl Player {
    /// Creates a player record.
    pub fn new(id: u32, name: impl Into<String>, position: Position) -> Player {
        Player {
            id,
            name: name.into(),
            position,
        }
    }
}

/// Immutable game snapshot delivered at the start of a tick.
///
/// Cell value 0 is empty, any other value is the id of the player whose trail occupies it.
///
/// # Text form
///
/// ```text
/// frame 12
/// grid 4 3
/// player 1 1 1 laura
/// row 0 0 0 0
/// row 0 1 0 0
/// row 0 1 0 0
/// end
/// ```
///
/// Player names run to the end of their line and may contain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    frame: u64,
    width: i32,
    height: i32,
    grid: Vec<u32>,
    players: Vec<Player>,
}

impl GameState {
    /// Builds a snapshot from a row-major grid.
    ///
    /// # Errors
    /// Returned when a dimension is not positive, when `grid` does not hold exactly
    /// `width * height` cells, or when a player uses the reserved id 0.
    pub fn new(
        frame: u64,
        width: i32,
        height: i32,
        grid: Vec<u32>,
        players: Vec<Player>,
    ) -> anyhow::Result<GameState> {
        ensure!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        let expected = width as usize * height as usize;
        ensure!(
            grid.len() == expected,
            "grid holds {} cells instead of {expected}",
            grid.len()
        );
        if let Some(player) = players.iter().find(|p| p.id == 0) {
            bail!("player '{}' uses reserved id 0", player.name);
        }
        Ok(GameState {
            frame,
            width,
            height,
            grid,
            players,
        })
    }

    /// An empty board with no players, at frame 0.
    ///
    /// # Panics
    /// If a dimension is not positive.
    pub fn empty(width: i32, height: i32) -> GameState {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        GameState {
            frame: 0,
            width,
            height,
            grid: vec![0; width as usize * height as usize],
            players: vec![],
        }
    }

    /// Adds a player and marks its head cell with its id.
    #[must_use]
    pub fn with_player(mut self, player: Player) -> GameState {
        let position = player.position;
        let id = player.id;
        self.players.push(player);
        self.with_cell(position, id)
    }

    /// Sets one cell. Out-of-grid positions are ignored.
    #[must_use]
    pub fn with_cell(mut self, position: Position, value: u32) -> GameState {
        if let Some(index) = self.index(position) {
            self.grid[index] = value;
        }
        self
    }

    /// Sets the frame counter.
    #[must_use]
    pub fn with_frame(self, frame: u64) -> GameState {
        GameState { frame, ..self }
    }

    /// Server tick counter.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// All players still in the game.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player registered under `name`, if any.
    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// True if `position` lies within `[0, width) x [0, height)`.
    pub fn is_inside_grid(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    /// The cell value at `position`, `None` outside the grid.
    pub fn grid_cell(&self, position: Position) -> Option<u32> {
        self.index(position).map(|i| self.grid[i])
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.is_inside_grid(position) {
            return None;
        }
        Some(position.y as usize * self.width as usize + position.x as usize)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frame {}", self.frame)?;
        writeln!(f, "grid {} {}", self.width, self.height)?;
        for p in &self.players {
            writeln!(
                f,
                "player {} {} {} {}",
                p.id, p.position.x, p.position.y, p.name
            )?;
        }
        for row in self.grid.chunks(self.width as usize) {
            let cells = row
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "row {cells}")?;
        }
        writeln!(f, "end")
    }
}

impl FromStr for GameState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut frame = 0;
        let mut dims = None;
        let mut players = vec![];
        let mut grid = vec![];
        let mut rows = 0;
        let mut ended = false;

        for (number, line) in s.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
            if line.is_empty() {
                continue;
            }
            ensure!(!ended, "line {number}: content after 'end'");
            let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
            match keyword {
                "frame" => {
                    frame = rest
                        .trim()
                        .parse()
                        .with_context(|| format!("line {number}: invalid frame number"))?;
                }
                "grid" => {
                    let values = parse_numbers::<i32>(rest)
                        .with_context(|| format!("line {number}: invalid grid size"))?;
                    let [width, height] = values[..] else {
                        bail!("line {number}: 'grid' expects width and height");
                    };
                    ensure!(
                        width > 0 && height > 0,
                        "line {number}: grid dimensions must be positive"
                    );
                    dims = Some((width, height));
                }
                "player" => {
                    let mut fields = rest.trim().splitn(4, ' ');
                    let mut next_number = |what: &str| -> anyhow::Result<i64> {
                        fields
                            .next()
                            .with_context(|| format!("line {number}: missing player {what}"))?
                            .parse()
                            .with_context(|| format!("line {number}: invalid player {what}"))
                    };
                    let id = next_number("id")?;
                    let x = next_number("x")?;
                    let y = next_number("y")?;
                    let name = fields.next().unwrap_or_default().trim();
                    ensure!(!name.is_empty(), "line {number}: missing player name");
                    let id = u32::try_from(id)
                        .ok()
                        .filter(|&id| id > 0)
                        .with_context(|| format!("line {number}: player id must be positive"))?;
                    let x = i32::try_from(x).context("player x out of range")?;
                    let y = i32::try_from(y).context("player y out of range")?;
                    players.push(Player::new(id, name, Position::new(x, y)));
                }
                "row" => {
                    let (width, height) =
                        dims.with_context(|| format!("line {number}: 'row' before 'grid'"))?;
                    let cells = parse_numbers::<u32>(rest)
                        .with_context(|| format!("line {number}: invalid cell value"))?;
                    ensure!(
                        cells.len() == width as usize,
                        "line {number}: row has {} cells instead of {width}",
                        cells.len()
                    );
                    ensure!(rows < height, "line {number}: more than {height} rows");
                    grid.extend(cells);
                    rows += 1;
                }
                "end" => ended = true,
                other => bail!("line {number}: unknown keyword '{other}'"),
            }
        }

        ensure!(ended, "snapshot is missing its 'end' line");
        let (width, height) = dims.context("snapshot is missing its 'grid' line")?;
        ensure!(
            rows == height,
            "snapshot has {rows} rows instead of {height}"
        );
        GameState::new(frame, width, height, grid, players)
    }
}

fn parse_numbers<T: FromStr>(s: &str) -> anyhow::Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.split_whitespace()
        .map(|v| v.parse::<T>().with_context(|| format!("'{v}' is not a number")))
        .collect()
}
