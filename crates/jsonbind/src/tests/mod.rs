mod capture;
mod chunking;
mod dispatch;
