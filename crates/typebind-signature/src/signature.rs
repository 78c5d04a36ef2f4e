use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    fn from_descriptor(b: u8) -> Option<Self> {
        Some(match b {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    /// Java keyword for this primitive (`int`, `boolean`, ...).
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

/// One `.`-separated segment of a class type signature. The first segment carries the package
/// in internal form (`com/example/Outer`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSegment {
    pub name: String,
    pub type_args: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    pub segments: Vec<ClassTypeSegment>,
}

impl ClassTypeSignature {
    /// `Lcom/example/Outer<TT;>.Inner;` -> `com.example.Outer$Inner`.
    pub fn binary_name(&self) -> String {
        let mut out = String::new();
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx == 0 {
                out.push_str(&segment.name.replace('/', "."));
            } else {
                out.push('$');
                out.push_str(&segment.name);
            }
        }
        out
    }

    /// Type arguments of the innermost segment.
    ///
    /// Arguments of enclosing classes are not modeled; `Outer<TT;>.Inner` names the raw
    /// `Outer$Inner`.
    pub fn type_args(&self) -> impl Iterator<Item = &TypeSignature> {
        self.segments
            .last()
            .into_iter()
            .flat_map(|segment| segment.type_args.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Class(ClassTypeSignature),
    TypeVar(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<TypeSignature>,
    /// `None` for `V`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<TypeSignature>,
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(sig);
    let type_params = p.type_params()?;
    p.expect(b'L')?;
    let super_class = p.class_type()?;
    let mut interfaces = Vec::new();
    while p.peek().is_some() {
        p.expect(b'L')?;
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_params,
        super_class,
        interfaces,
    })
}

/// Parse a field signature. Plain descriptors (`I`, `Ljava/lang/String;`) are accepted too.
pub fn parse_field_signature(sig: &str) -> Result<TypeSignature> {
    let mut p = Parser::new(sig);
    let ty = p.java_type()?;
    p.finish()?;
    Ok(ty)
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(sig);
    let type_params = p.type_params()?;
    p.expect(b'(')?;
    let mut params = Vec::new();
    while !p.eat(b')') {
        params.push(p.java_type()?);
    }
    let return_type = if p.eat(b'V') {
        None
    } else {
        Some(p.java_type()?)
    };
    let mut throws = Vec::new();
    while p.eat(b'^') {
        throws.push(p.reference()?);
    }
    p.finish()?;
    Ok(MethodSignature {
        type_params,
        params,
        return_type,
        throws,
    })
}

struct Parser<'a> {
    sig: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(sig: &'a str) -> Self {
        Self { sig, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.sig.as_bytes().get(self.pos).copied()
    }

    fn eof(&self) -> Error {
        Error::UnexpectedEof(self.sig.to_string())
    }

    fn invalid(&self) -> Error {
        Error::InvalidSignature(self.sig.to_string())
    }

    fn unsupported(&self, what: &'static str) -> Error {
        Error::Unsupported {
            what,
            signature: self.sig.to_string(),
        }
    }

    fn bump(&mut self) -> Result<u8> {
        let b = self.peek().ok_or_else(|| self.eof())?;
        self.pos += 1;
        Ok(b)
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        if self.bump()? == b {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn finish(&self) -> Result<()> {
        if self.pos == self.sig.len() {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    /// Read an unqualified identifier. `/` is only accepted inside package-qualified names.
    fn identifier(&mut self, allow_slash: bool) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let reserved = matches!(b, b'.' | b';' | b'[' | b'<' | b'>' | b':')
                || (b == b'/' && !allow_slash);
            if reserved {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                None => self.eof(),
                Some(_) => self.invalid(),
            });
        }
        // Identifier bytes stop at ASCII delimiters, so `start..pos` is a char boundary range.
        Ok(&self.sig[start..self.pos])
    }

    fn type_params(&mut self) -> Result<Vec<TypeParameter>> {
        if !self.eat(b'<') {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        while !self.eat(b'>') {
            let name = self.identifier(false)?.to_string();
            self.expect(b':')?;
            let class_bound = match self.peek() {
                Some(b'L' | b'T' | b'[') => Some(self.reference()?),
                _ => None,
            };
            let mut interface_bounds = Vec::new();
            while self.eat(b':') {
                interface_bounds.push(self.reference()?);
            }
            params.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if params.is_empty() {
            return Err(self.invalid());
        }
        Ok(params)
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        let b = self.peek().ok_or_else(|| self.eof())?;
        if let Some(base) = BaseType::from_descriptor(b) {
            self.pos += 1;
            return Ok(TypeSignature::Base(base));
        }
        self.reference()
    }

    fn reference(&mut self) -> Result<TypeSignature> {
        match self.bump()? {
            b'L' => Ok(TypeSignature::Class(self.class_type()?)),
            b'T' => {
                let name = self.identifier(false)?.to_string();
                self.expect(b';')?;
                Ok(TypeSignature::TypeVar(name))
            }
            b'[' => Err(self.unsupported("array type")),
            _ => Err(self.invalid()),
        }
    }

    /// Parse the remainder of a class type signature; the leading `L` is already consumed.
    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        let name = self.identifier(true)?;
        if name.split('/').any(str::is_empty) {
            return Err(self.invalid());
        }
        let mut segments = vec![ClassTypeSegment {
            name: name.to_string(),
            type_args: self.type_args()?,
        }];
        loop {
            match self.bump()? {
                b';' => break,
                b'.' => {
                    let name = self.identifier(false)?.to_string();
                    let type_args = self.type_args()?;
                    segments.push(ClassTypeSegment { name, type_args });
                }
                _ => return Err(self.invalid()),
            }
        }
        Ok(ClassTypeSignature { segments })
    }

    fn type_args(&mut self) -> Result<Vec<TypeSignature>> {
        if !self.eat(b'<') {
            return Ok(Vec::new());
        }
        let mut args = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.eof()),
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'*' | b'+' | b'-') => return Err(self.unsupported("wildcard type argument")),
                Some(_) => args.push(self.reference()?),
            }
        }
        if args.is_empty() {
            return Err(self.invalid());
        }
        Ok(args)
    }
}
