use fast_qr_segments::{BitBuffer, BitSink, QrSegment, Utf8};

fn build_segment(kind: &str, text: &str) -> fast_qr_segments::Result<QrSegment> {
	match kind {
		"numeric" => QrSegment::make_numeric(text),
		"alnum"   => QrSegment::make_alphanumeric(text),
		"kanji"   => QrSegment::make_kanji(text),
		_         => QrSegment::make_text_with(text, &Utf8),
	}
}

fn print_segment(kind: &str, text: &str) {
	let seg: QrSegment = match build_segment(kind, text) {
		Ok(seg) => seg,
		Err(e) => {
			eprintln!("{} {:?}: {}", kind, text, e);
			return;
		}
	};
	let mut bb = BitBuffer::with_capacity(seg.data_bits() + 4);
	bb.put(seg.mode().mode_bits(), 4);
	match seg.write(&mut bb) {
		Ok(()) => println!("{:?} x{}: {}", seg.mode(), seg.num_chars(), bb),
		Err(e) => eprintln!("{} {:?}: {}", kind, text, e),
	}
}

fn do_basic_demo() {
	print_segment("numeric", "01234567");
	print_segment("alnum", "AC-42");
	print_segment("byte", "Kerim Büyükakyüz");
	print_segment("kanji", "点茗");
}

pub fn main() {
	let args: Vec<String> = std::env::args().skip(1).collect();
	if args.len() == 2 {
		print_segment(&args[0], &args[1]);
	} else {
		do_basic_demo();
	}
}
