use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::{map_res, opt, recognize},
    error::{Error as NomError, ParseError},
    sequence::{delimited, pair},
    Finish, IResult,
};
use num::{Signed, Unsigned};

const fn is_int_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn unsigned<N: Unsigned + FromStr>(input: &str) -> IResult<&str, N> {
    map_res(take_while1(is_int_digit), str::parse)(input)
}

pub fn signed<N: Signed + FromStr>(input: &str) -> IResult<&str, N> {
    map_res(
        recognize(pair(opt(char('-')), take_while1(is_int_digit))),
        str::parse,
    )(input)
}

/// Wraps `inner` so that it eats surrounding spaces and tabs.
pub fn ws<'a, F: 'a, O, E: ParseError<&'a str>>(
    inner: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(space0, inner, space0)
}

/// Detaches a parser error from the input it borrows, so it can be boxed.
pub fn finish<T>(res: IResult<&str, T>) -> Result<T, NomError<String>> {
    res.finish()
        .map(|(_, out)| out)
        .map_err(|e| NomError::new(e.input.to_string(), e.code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(unsigned::<u32>("42 rest"), Ok((" rest", 42)));
        assert_eq!(signed::<i64>("-17,"), Ok((",", -17)));
        assert_eq!(signed::<i64>("8"), Ok(("", 8)));
        assert!(unsigned::<u8>("x").is_err());
    }

    #[test]
    fn spaced() {
        let mut p = ws(unsigned::<u16>);

        assert_eq!(p("  7  ,"), Ok((",", 7)));
    }

    #[test]
    fn finish_owns_error() {
        let err = finish(unsigned::<u8>("nope")).unwrap_err();

        assert_eq!(err.input, "nope");
        assert_eq!(finish(unsigned::<u8>("3")), Ok(3));
    }
}
