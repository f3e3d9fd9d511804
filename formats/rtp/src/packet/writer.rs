use std::io;

use utils::traits::writer::WriteTo;

use crate::errors::RtpError;

use super::AudioPacket;

impl<W: io::Write> WriteTo<W> for AudioPacket {
    type Error = RtpError;
    fn write_to(&self, writer: &mut W) -> Result<(), Self::Error> {
        self.header.write_to(writer)?;
        writer.write_all(&self.payload)?;
        Ok(())
    }
}
