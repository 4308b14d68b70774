//! Game results relative to a player, and win/draw/loss tallies over many games.
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Neg, Sub};

use cast_trait::Cast;
use num_traits::{One, Zero};

use crate::board::{Outcome, Player};

/// A value expressed independently of any player, that can be viewed from one of them.
pub trait NonPov: Sized {
    type Output: Pov<Output = Self>;

    /// View this value from the POV of `pov`.
    fn pov(self, pov: Player) -> Self::Output;
}

/// A value expressed from the POV of some player.
pub trait Pov: Sized {
    type Output: NonPov<Output = Self>;

    /// Turn this back into an absolute value, given that it was seen from `pov`.
    fn un_pov(self, pov: Player) -> Self::Output;

    /// The same value seen from the opponent.
    fn flip(self) -> Self {
        self.un_pov(Player::A).pov(Player::B)
    }
}

/// The [Outcome] of a game from the POV of one of the players.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OutcomeWDL {
    Win,
    Draw,
    Loss,
}

impl OutcomeWDL {
    /// A tally containing only this outcome.
    pub fn to_wdl<V: One + Zero>(self) -> WDL<V> {
        let one_if = |o: OutcomeWDL| if o == self { V::one() } else { V::zero() };
        WDL::new(one_if(OutcomeWDL::Win), one_if(OutcomeWDL::Draw), one_if(OutcomeWDL::Loss))
    }

    /// `1` for a win, `0` for a draw and `-1` for a loss.
    pub fn sign<V: One + Zero + Neg<Output = V>>(self) -> V {
        match self {
            OutcomeWDL::Win => V::one(),
            OutcomeWDL::Draw => V::zero(),
            OutcomeWDL::Loss => -V::one(),
        }
    }
}

impl NonPov for Outcome {
    type Output = OutcomeWDL;

    fn pov(self, pov: Player) -> OutcomeWDL {
        match self {
            Outcome::Draw => OutcomeWDL::Draw,
            Outcome::WonBy(winner) if winner == pov => OutcomeWDL::Win,
            Outcome::WonBy(_) => OutcomeWDL::Loss,
        }
    }
}

impl Pov for OutcomeWDL {
    type Output = Outcome;

    fn un_pov(self, pov: Player) -> Outcome {
        match self {
            OutcomeWDL::Win => Outcome::WonBy(pov),
            OutcomeWDL::Draw => Outcome::Draw,
            OutcomeWDL::Loss => Outcome::WonBy(pov.other()),
        }
    }
}

/// Counts (or fractions) of wins, draws and losses, typically from the POV of one bot over a match.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WDL<V> {
    pub win: V,
    pub draw: V,
    pub loss: V,
}

impl<V> WDL<V> {
    pub fn new(win: V, draw: V, loss: V) -> Self {
        WDL { win, draw, loss }
    }

    pub fn map<W>(self, mut f: impl FnMut(V) -> W) -> WDL<W> {
        WDL::new(f(self.win), f(self.draw), f(self.loss))
    }

    fn zip_with<W>(self, other: WDL<V>, mut f: impl FnMut(V, V) -> W) -> WDL<W> {
        WDL::new(
            f(self.win, other.win),
            f(self.draw, other.draw),
            f(self.loss, other.loss),
        )
    }

    pub fn cast<W>(self) -> WDL<W>
    where
        V: Cast<W>,
    {
        self.map(Cast::cast)
    }
}

impl<V: Copy + Add<Output = V> + Sub<Output = V>> WDL<V> {
    /// `win - loss`
    pub fn value(self) -> V {
        self.win - self.loss
    }

    /// The number of games in this tally.
    pub fn sum(self) -> V {
        self.win + self.draw + self.loss
    }
}

impl WDL<f32> {
    /// The fraction of points scored, counting a draw as half a win.
    pub fn score(self) -> f32 {
        (self.win + self.draw / 2.0) / self.sum()
    }

    /// The Elo difference implied by [WDL::score]. Infinite if every game was won or lost.
    pub fn elo(self) -> f32 {
        let elo = -400.0 * (1.0 / self.score() - 1.0).log10();
        // avoid printing -0.0
        elo + 0.0
    }
}

impl<V: Add<Output = V>> Add for WDL<V> {
    type Output = WDL<V>;

    fn add(self, rhs: WDL<V>) -> WDL<V> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<V: Copy + Add<Output = V>> AddAssign for WDL<V> {
    fn add_assign(&mut self, rhs: WDL<V>) {
        *self = *self + rhs;
    }
}

impl<V: Copy + Div<Output = V>> Div<V> for WDL<V> {
    type Output = WDL<V>;

    fn div(self, rhs: V) -> WDL<V> {
        self.map(|x| x / rhs)
    }
}

impl<V: Default + Add<Output = V>> Sum for WDL<V> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(WDL::default(), |acc, x| acc + x)
    }
}
