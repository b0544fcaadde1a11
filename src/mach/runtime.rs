use super::{
    eval, Channel, Listing, Stack, Var, FOR_STACK_DEPTH, GOSUB_STACK_DEPTH, LINE_WIDTH,
};
use crate::error;
use crate::lang::{Error, Int, Lexer, Operator, Token, Word};

type Result<T> = std::result::Result<T, Error>;

/// Capability callback for `PEEK`: address in, value out.
pub type PeekFn = Box<dyn FnMut(Int) -> Int>;

/// Capability callback for `POKE`. The callback enforces any
/// address-range protection; the interpreter places no constraints.
pub type PokeFn = Box<dyn FnMut(Int, Int)>;

/// Loop bookkeeping pushed by `FOR`, consulted and popped by `NEXT`.
#[derive(Debug, Clone, Copy)]
struct ForFrame {
    var: char,
    to: Int,
    resume: usize,
}

/// ## Statement executor
///
/// Owns the whole interpreter state: the line store, the variable
/// table, the two frame stacks, the program counter, and the finished
/// flag. Statements execute straight off the lexer; `RUN` drives the
/// program counter over the line store within one call, skipping
/// tombstones, until it passes the high-water mark or something sets
/// the finished flag.
pub struct Runtime {
    listing: Listing,
    vars: Var,
    for_stack: Stack<ForFrame>,
    gosub_stack: Stack<usize>,
    pc: usize,
    finished: bool,
    peek: PeekFn,
    poke: PokeFn,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Box::new(|_| 0), Box::new(|_, _| {}))
    }
}

impl Runtime {
    pub fn new(peek: PeekFn, poke: PokeFn) -> Runtime {
        Runtime {
            listing: Listing::new(),
            vars: Var::new(),
            for_stack: Stack::new(FOR_STACK_DEPTH, "FOR STACK OVERFLOW"),
            gosub_stack: Stack::new(GOSUB_STACK_DEPTH, "GOSUB STACK OVERFLOW"),
            pc: 0,
            finished: false,
            peek,
            poke,
        }
    }

    pub fn bytes_free(&self) -> usize {
        self.listing.bytes_free()
    }

    /// Accepts one line of input. A leading line number stores the line
    /// (or deletes it when no statement follows); anything else
    /// executes immediately against live state. Returns `true` when the
    /// input was executed rather than stored.
    ///
    /// Errors abort only the statement they occur in; the interpreter
    /// stays usable for the next line.
    pub fn enter(&mut self, input: &str, chan: &mut dyn Channel) -> Result<bool> {
        let input = input.trim_end_matches(&['\n', '\r'][..]);
        let mut width = LINE_WIDTH.min(input.len());
        while !input.is_char_boundary(width) {
            width -= 1;
        }
        let text = &input[..width];
        let mut lex = Lexer::new(text)?;
        if let Token::Number(number) = *lex.token() {
            match lex.advance() {
                Ok(()) if matches!(lex.token(), Token::Eol | Token::Eof) => {
                    self.listing.remove(number)
                }
                _ => self.listing.insert(number, text)?,
            }
            Ok(false)
        } else {
            self.reset();
            self.statement(&mut lex, chan)?;
            Ok(true)
        }
    }

    fn reset(&mut self) {
        self.pc = 0;
        self.for_stack.clear();
        self.gosub_stack.clear();
        self.finished = false;
    }

    /// Single-level dispatch on the leading token. Every handler
    /// consumes through the end-of-line marker before returning.
    fn statement(&mut self, lex: &mut Lexer, chan: &mut dyn Channel) -> Result<()> {
        match lex.token() {
            Token::Word(Word::Print) => self.print_statement(lex, chan),
            Token::Word(Word::If) => self.if_statement(lex, chan),
            Token::Word(Word::Goto) => self.goto_statement(lex),
            Token::Word(Word::Gosub) => self.gosub_statement(lex),
            Token::Word(Word::Return) => self.return_statement(lex),
            Token::Word(Word::For) => self.for_statement(lex),
            Token::Word(Word::Next) => self.next_statement(lex),
            Token::Word(Word::Peek) => self.peek_statement(lex),
            Token::Word(Word::Poke) => self.poke_statement(lex),
            Token::Word(Word::End) => self.end_statement(lex),
            Token::Word(Word::New) => self.new_statement(lex),
            Token::Word(Word::Run) => self.run_statement(lex, chan),
            Token::Word(Word::List) => self.list_statement(lex, chan),
            Token::Word(Word::Fre) => self.fre_statement(lex, chan),
            Token::Word(Word::Let) => {
                lex.advance()?;
                self.let_statement(lex)
            }
            Token::Variable(_) => self.let_statement(lex),
            // A comment line reduces to this after the lexer's
            // comment skip.
            Token::Eol | Token::Eof => lex.expect_end(),
            _ => {
                self.finished = true;
                Err(error!(SyntaxError, ..&lex.column(); "UNKNOWN STATEMENT"))
            }
        }
    }

    fn print_statement(&mut self, lex: &mut Lexer, chan: &mut dyn Channel) -> Result<()> {
        lex.advance()?;
        loop {
            match lex.token() {
                Token::Eol | Token::Eof => break,
                Token::String(s) => {
                    chan.write(s);
                    lex.advance()?;
                }
                Token::Comma => {
                    chan.put_char(' ');
                    lex.advance()?;
                }
                Token::Semicolon => lex.advance()?,
                _ => {
                    let val = eval::expr(lex, &self.vars)?;
                    chan.write(&val.to_string());
                }
            }
        }
        chan.put_char('\n');
        lex.expect_end()
    }

    /// `IF` recurses into the executor for the taken branch; the depth
    /// is bounded by the tokens on one line, not by program size.
    fn if_statement(&mut self, lex: &mut Lexer, chan: &mut dyn Channel) -> Result<()> {
        lex.advance()?;
        let r = eval::relation(lex, &self.vars)?;
        if *lex.token() != Token::Word(Word::Then) {
            return Err(error!(SyntaxError, ..&lex.column(); "EXPECTED THEN"));
        }
        if r != 0 {
            lex.advance()?;
            self.statement(lex, chan)
        } else {
            // the untaken branch must not be classified at all; it may
            // not even tokenize
            lex.skip_to_end();
            lex.expect_end()
        }
    }

    fn let_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        let var = lex.variable()?;
        lex.expect(&Token::Operator(Operator::Equal), "EXPECTED =")?;
        let val = eval::expr(lex, &self.vars)?;
        lex.expect_end()?;
        self.vars.store(var, val);
        Ok(())
    }

    fn goto_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        let number = lex.number()?;
        lex.expect_end()?;
        self.pc = self
            .listing
            .find(number)
            .ok_or_else(|| error!(UndefinedLine))?;
        Ok(())
    }

    fn gosub_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        let number = lex.number()?;
        lex.expect_end()?;
        let target = self
            .listing
            .find(number)
            .ok_or_else(|| error!(UndefinedLine))?;
        self.gosub_stack.push(self.pc)?;
        self.pc = target;
        Ok(())
    }

    fn return_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        lex.expect_end()?;
        if let Some(resume) = self.gosub_stack.pop() {
            self.pc = resume;
        }
        Ok(())
    }

    fn for_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        let var = lex.variable()?;
        lex.expect(&Token::Operator(Operator::Equal), "EXPECTED =")?;
        let from = eval::expr(lex, &self.vars)?;
        // the bound may refer to the loop variable
        self.vars.store(var, from);
        lex.expect(&Token::Word(Word::To), "EXPECTED TO")?;
        let to = eval::expr(lex, &self.vars)?;
        lex.expect_end()?;
        self.for_stack.push(ForFrame {
            var,
            to,
            resume: self.pc,
        })?;
        Ok(())
    }

    /// A `NEXT` whose variable does not match the innermost frame is a
    /// no-op past syntax consumption.
    fn next_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        let var = lex.variable()?;
        lex.expect_end()?;
        if let Some(frame) = self.for_stack.last().copied() {
            if frame.var == var {
                let next = self.vars.fetch(var).wrapping_add(1);
                self.vars.store(var, next);
                if next <= frame.to {
                    self.pc = frame.resume;
                } else {
                    self.for_stack.pop();
                }
            }
        }
        Ok(())
    }

    fn peek_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        let addr = eval::expr(lex, &self.vars)?;
        lex.expect(&Token::Comma, "EXPECTED ,")?;
        let var = lex.variable()?;
        lex.expect_end()?;
        let val = (self.peek)(addr);
        self.vars.store(var, val);
        Ok(())
    }

    fn poke_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        let addr = eval::expr(lex, &self.vars)?;
        lex.expect(&Token::Comma, "EXPECTED ,")?;
        let val = eval::expr(lex, &self.vars)?;
        lex.expect_end()?;
        (self.poke)(addr, val);
        Ok(())
    }

    fn end_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        lex.expect_end()?;
        self.finished = true;
        Ok(())
    }

    fn new_statement(&mut self, lex: &mut Lexer) -> Result<()> {
        lex.advance()?;
        lex.expect_end()?;
        self.listing.clear();
        Ok(())
    }

    fn run_statement(&mut self, lex: &mut Lexer, chan: &mut dyn Channel) -> Result<()> {
        lex.advance()?;
        lex.expect_end()?;
        if self.listing.is_empty() {
            return Ok(());
        }
        self.reset();
        self.run(chan)
    }

    /// The run loop: visit slots by ascending position, skipping
    /// tombstones, until the counter passes the high-water mark or the
    /// finished flag is set. An error halts the run, annotated with the
    /// offending line number, and leaves the interpreter usable.
    fn run(&mut self, chan: &mut dyn Channel) -> Result<()> {
        while !self.finished && self.pc < self.listing.len() {
            let slot = self.pc;
            self.pc += 1;
            let (number, text) = match self.listing.get(slot) {
                Some(line) => (line.number(), line.text().to_string()),
                None => continue,
            };
            if let Err(error) = self.execute_line(&text, chan) {
                self.finished = true;
                return Err(error.in_line_number(Some(number)));
            }
        }
        Ok(())
    }

    fn execute_line(&mut self, text: &str, chan: &mut dyn Channel) -> Result<()> {
        let mut lex = Lexer::new(text)?;
        lex.number()?;
        self.statement(&mut lex, chan)
    }

    fn list_statement(&mut self, lex: &mut Lexer, chan: &mut dyn Channel) -> Result<()> {
        lex.advance()?;
        let mut start = Some(0);
        let mut end = self.listing.len().checked_sub(1);
        match lex.token() {
            Token::Number(_) => {
                let n = lex.number()?;
                start = self.listing.find(n);
                match lex.token() {
                    Token::Eol | Token::Eof => end = start,
                    Token::Operator(Operator::Minus) => {
                        lex.advance()?;
                        if let Token::Number(_) = lex.token() {
                            let m = lex.number()?;
                            end = self.listing.find(m);
                        }
                    }
                    _ => return Err(error!(SyntaxError, ..&lex.column(); "EXPECTED -")),
                }
            }
            Token::Operator(Operator::Minus) => {
                lex.advance()?;
                if let Token::Number(_) = lex.token() {
                    let m = lex.number()?;
                    end = self.listing.find(m);
                }
            }
            _ => {}
        }
        lex.expect_end()?;
        // unresolvable line numbers degrade to a bare newline
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                chan.put_char('\n');
                return Ok(());
            }
        };
        for slot in start..=end {
            if let Some(line) = self.listing.get(slot) {
                chan.write(line.text());
                chan.put_char('\n');
            }
        }
        Ok(())
    }

    fn fre_statement(&mut self, lex: &mut Lexer, chan: &mut dyn Channel) -> Result<()> {
        lex.advance()?;
        lex.expect_end()?;
        chan.write(&format!("{} BYTES FREE\n", self.listing.bytes_free()));
        Ok(())
    }
}
