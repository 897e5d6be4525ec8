/// Sink for the semantic events produced by the matchers.
///
/// Events arrive in source order; every byte of the input is reported through
/// exactly one byte-carrying event. Byte counts are always positive. The
/// bracketing events and `unexpected_eof` default to no-ops since most
/// consumers only care about the byte-carrying subset.
pub(crate) trait Consumer {
    fn text(&mut self, length: usize);
    fn whitespace_in_arguments(&mut self, length: usize);
    fn opening_square(&mut self);
    fn closing_square(&mut self);
    fn comma(&mut self);
    fn argument_name(&mut self, length: usize);
    fn equals(&mut self);
    fn directive_name(&mut self, length: usize);
    fn opening_brace(&mut self);
    fn closing_brace(&mut self);
    fn escape(&mut self);

    fn push_directive(&mut self) {}
    fn pop_directive(&mut self) {}
    fn push_arguments(&mut self) {}
    fn pop_arguments(&mut self) {}
    fn unexpected_eof(&mut self) {}
}
