//! Chess piece classification.

use crate::Color;

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Returns the index of this piece kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the board letter for this kind with the given color:
    /// uppercase for White, lowercase for Black.
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Returns the lowercase English name ("pawn", "knight", ...).
    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The four kinds a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionKind {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromotionKind {
    /// All promotion choices in order.
    pub const ALL: [PromotionKind; 4] = [
        PromotionKind::Knight,
        PromotionKind::Bishop,
        PromotionKind::Rook,
        PromotionKind::Queen,
    ];

    /// Returns the corresponding piece kind.
    #[inline]
    pub const fn kind(self) -> PieceKind {
        match self {
            PromotionKind::Knight => PieceKind::Knight,
            PromotionKind::Bishop => PieceKind::Bishop,
            PromotionKind::Rook => PieceKind::Rook,
            PromotionKind::Queen => PieceKind::Queen,
        }
    }

    /// Parses a promotion choice from its English name, ignoring case
    /// (e.g. "queen", "Rook").
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "knight" => Some(PromotionKind::Knight),
            "bishop" => Some(PromotionKind::Bishop),
            "rook" => Some(PromotionKind::Rook),
            "queen" => Some(PromotionKind::Queen),
            _ => None,
        }
    }
}

impl std::fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_char() {
        assert_eq!(PieceKind::Pawn.to_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.to_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_char(Color::Black), 'n');
    }

    #[test]
    fn kind_names() {
        assert_eq!(PieceKind::Knight.name(), "knight");
        assert_eq!(format!("{}", PieceKind::Queen), "queen");
    }

    #[test]
    fn promotion_from_name() {
        assert_eq!(PromotionKind::from_name("queen"), Some(PromotionKind::Queen));
        assert_eq!(PromotionKind::from_name("ROOK"), Some(PromotionKind::Rook));
        assert_eq!(
            PromotionKind::from_name("Bishop"),
            Some(PromotionKind::Bishop)
        );
        assert_eq!(
            PromotionKind::from_name("knight"),
            Some(PromotionKind::Knight)
        );
        assert_eq!(PromotionKind::from_name("king"), None);
        assert_eq!(PromotionKind::from_name("pawn"), None);
        assert_eq!(PromotionKind::from_name(""), None);
    }

    #[test]
    fn promotion_kind_mapping() {
        for choice in PromotionKind::ALL {
            assert_ne!(choice.kind(), PieceKind::Pawn);
            assert_ne!(choice.kind(), PieceKind::King);
        }
    }
}
