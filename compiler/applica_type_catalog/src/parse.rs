//! Parses the source spelling of a type, e.g. `Map<String, ?>[]`, into a
//! [`TypeDescriptor`].

use crate::{Declared, Primitive, TypeArgument, TypeCatalog, TypeDescriptor};

/// An error returned by [`TypeCatalog::parse`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[allow(missing_docs)]
pub enum ParseError {
    #[error("the type `{0}` is not declared in the catalog")]
    UnknownType(String),

    #[error("unexpected `{found}` at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,

        /// The byte offset of the character.
        offset: usize,
    },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error(
        "the type `{name}` expects {expected} generic argument(s) but \
         {found} were supplied"
    )]
    ArityMismatch {
        /// The name of the generic type.
        name: String,

        /// The declared number of generic parameters.
        expected: usize,

        /// The supplied number of generic arguments.
        found: usize,
    },

    #[error("`{0}` can't be used as a generic argument")]
    InvalidArgument(String),
}

struct Parser<'a> {
    catalog: &'a TypeCatalog,
    source: &'a str,
    offset: usize,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.offset..];
        self.offset += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.source[self.offset..].chars().next()
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(found) if found == expected => {
                self.offset += found.len_utf8();
                Ok(())
            }
            Some(found) => Err(ParseError::UnexpectedCharacter {
                found,
                offset: self.offset,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn identifier(&mut self) -> Result<&str, ParseError> {
        self.skip_whitespace();

        let start = self.offset;
        let rest = &self.source[start..];
        let length = rest
            .find(|x: char| !(x.is_alphanumeric() || matches!(x, '_' | '$' | '.')))
            .unwrap_or(rest.len());

        if length == 0 {
            return Err(rest.chars().next().map_or(
                ParseError::UnexpectedEnd,
                |found| ParseError::UnexpectedCharacter { found, offset: start },
            ));
        }

        self.offset += length;
        Ok(&self.source[start..start + length])
    }

    fn argument(&mut self) -> Result<TypeArgument, ParseError> {
        if self.peek() == Some('?') {
            self.offset += 1;
            return Ok(TypeArgument::Wildcard);
        }

        let start = self.offset;
        let ty = self.ty()?;

        if ty.is_reference() {
            Ok(TypeArgument::Type(ty))
        } else {
            Err(ParseError::InvalidArgument(
                self.source[start..self.offset].trim().to_owned(),
            ))
        }
    }

    fn ty(&mut self) -> Result<TypeDescriptor, ParseError> {
        let name = self.identifier()?.to_owned();

        let mut ty = if name == "void" {
            TypeDescriptor::Void
        } else if let Some(primitive) = Primitive::from_keyword(&name) {
            TypeDescriptor::Primitive(primitive)
        } else {
            let id = self
                .catalog
                .get_id(&name)
                .ok_or_else(|| ParseError::UnknownType(name.clone()))?;

            let mut arguments = Vec::new();
            if self.peek() == Some('<') {
                self.offset += 1;

                loop {
                    arguments.push(self.argument()?);

                    if self.peek() == Some(',') {
                        self.offset += 1;
                    } else {
                        break;
                    }
                }

                self.expect('>')?;

                let expected = self.catalog.get(id).map_or(0, |x| x.arity());
                if expected != arguments.len() {
                    return Err(ParseError::ArityMismatch {
                        name,
                        expected,
                        found: arguments.len(),
                    });
                }
            }

            TypeDescriptor::Declared(Declared { id, arguments })
        };

        while self.peek() == Some('[') {
            if ty == TypeDescriptor::Void {
                return Err(ParseError::UnexpectedCharacter {
                    found: '[',
                    offset: self.offset,
                });
            }

            self.offset += 1;
            self.expect(']')?;
            ty = ty.array_of();
        }

        Ok(ty)
    }
}

impl TypeCatalog {
    /// Parses the source spelling of a type.
    ///
    /// Generic types may be written raw (`List`) or with exactly as many
    /// arguments as they declare (`Map<String, ?>`).
    ///
    /// # Errors
    ///
    /// See [`ParseError`] for more information.
    pub fn parse(&self, source: &str) -> Result<TypeDescriptor, ParseError> {
        let mut parser = Parser { catalog: self, source, offset: 0 };
        let ty = parser.ty()?;

        match parser.peek() {
            None => Ok(ty),
            Some(found) => Err(ParseError::UnexpectedCharacter {
                found,
                offset: parser.offset,
            }),
        }
    }
}
