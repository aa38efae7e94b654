use crate::outcome::Multiplier;

/// Wire codes for the six composite outside bets. Single numbers use
/// their own value 0-36.
const WIRE_LOW: u8 = 37;
const WIRE_HIGH: u8 = 38;
const WIRE_EVEN: u8 = 39;
const WIRE_ODD: u8 = 40;
const WIRE_RED: u8 = 41;
const WIRE_BLACK: u8 = 42;

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];
pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];

/// One selectable outcome on the table. The settlement authority
/// consumes the flat wire code; everything client-side works with the
/// explicit variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bet {
    Number(u8),
    Low,
    High,
    Even,
    Odd,
    Red,
    Black,
}

impl Bet {
    /// A single-number bet; `None` above 36.
    pub fn number(value: u8) -> Option<Self> {
        (value <= 36).then_some(Bet::Number(value))
    }

    pub fn from_wire(code: u8) -> Option<Self> {
        match code {
            0..=36 => Some(Bet::Number(code)),
            WIRE_LOW => Some(Bet::Low),
            WIRE_HIGH => Some(Bet::High),
            WIRE_EVEN => Some(Bet::Even),
            WIRE_ODD => Some(Bet::Odd),
            WIRE_RED => Some(Bet::Red),
            WIRE_BLACK => Some(Bet::Black),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Bet::Number(value) => value,
            Bet::Low => WIRE_LOW,
            Bet::High => WIRE_HIGH,
            Bet::Even => WIRE_EVEN,
            Bet::Odd => WIRE_ODD,
            Bet::Red => WIRE_RED,
            Bet::Black => WIRE_BLACK,
        }
    }

    /// Fixed payout ratio for this selection: 36x for single numbers,
    /// 2x for the outside bets.
    pub fn multiplier(self) -> Multiplier {
        match self {
            Bet::Number(_) => Multiplier::new(360, 10)
                .expect("static single-number ratio"),
            _ => Multiplier::new(20, 10).expect("static outside ratio"),
        }
    }

    /// Whether a wheel number settles this selection as a win.
    pub fn covers(self, number: u8) -> bool {
        match self {
            Bet::Number(value) => value == number,
            Bet::Low => (1..=18).contains(&number),
            Bet::High => (19..=36).contains(&number),
            Bet::Even => number != 0 && number % 2 == 0,
            Bet::Odd => number % 2 == 1,
            Bet::Red => RED_NUMBERS.contains(&number),
            Bet::Black => BLACK_NUMBERS.contains(&number),
        }
    }

    pub fn label(self) -> String {
        match self {
            Bet::Number(value) => value.to_string(),
            Bet::Low => String::from("Low (1-18)"),
            Bet::High => String::from("High (19-36)"),
            Bet::Even => String::from("Even"),
            Bet::Odd => String::from("Odd"),
            Bet::Red => String::from("Red"),
            Bet::Black => String::from("Black"),
        }
    }

    pub fn all() -> Vec<Bet> {
        let mut bets: Vec<Bet> = (0..=36).map(Bet::Number).collect();
        bets.extend([
            Bet::Low,
            Bet::High,
            Bet::Even,
            Bet::Odd,
            Bet::Red,
            Bet::Black,
        ]);
        bets
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NumberColor {
    Red,
    Black,
    Green,
}

pub fn color_of(number: u8) -> NumberColor {
    if number == 0 {
        NumberColor::Green
    } else if RED_NUMBERS.contains(&number) {
        NumberColor::Red
    } else {
        NumberColor::Black
    }
}
