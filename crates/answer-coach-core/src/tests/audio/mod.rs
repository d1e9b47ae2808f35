mod capture;
mod encoder;
mod session;
